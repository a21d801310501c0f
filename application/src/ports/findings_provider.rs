//! Findings provider port (Observer agent)
//!
//! Turns a scan into a textual description of visual findings. Called
//! exactly once per session.

use super::provider_error::ProviderError;
use async_trait::async_trait;
use visionlink_domain::ImageReference;

/// Vision agent that describes a retinal scan.
///
/// Implementations hold heavy resources (a loaded vision model). The
/// orchestrator brackets the single [`analyze`](Self::analyze) call with
/// [`acquire`](Self::acquire) and [`release`](Self::release); `release` runs
/// right after `analyze` returns, success or not.
#[async_trait]
pub trait FindingsProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Take a lease on the underlying resource before use.
    async fn acquire(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Describe the visual findings in the scan.
    async fn analyze(&self, image: &ImageReference) -> Result<String, ProviderError>;

    /// Give back the lease taken by [`acquire`](Self::acquire).
    async fn release(&self) {}
}
