//! Question provider port (Investigator agent)

use super::provider_error::ProviderError;
use async_trait::async_trait;

/// What the Investigator wants to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// Ask the patient this question
    Ask(String),
    /// Nothing useful left to ask
    Stop,
}

/// Text agent that produces one follow-up question per round.
///
/// Receives read-only projections of the session: the findings and the
/// rendered history (empty string before the first answer). Held for the
/// whole interview; the orchestrator releases it when the session ends.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn acquire(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn ask(&self, findings: &str, history: &str) -> Result<NextQuestion, ProviderError>;

    async fn release(&self) {}
}
