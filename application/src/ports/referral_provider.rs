//! Referral provider port (Diagnostician agent)

use super::provider_error::ProviderError;
use async_trait::async_trait;
use visionlink_domain::ReferralAssessment;

/// Text agent that decides whether a referral can be written.
///
/// Returns a structured [`ReferralAssessment`]; the orchestrator never looks
/// inside the report text to decide whether to loop.
#[async_trait]
pub trait ReferralProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn acquire(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn evaluate(
        &self,
        findings: &str,
        history: &str,
    ) -> Result<ReferralAssessment, ProviderError>;

    async fn release(&self) {}
}
