//! Triage parameters: interview loop control.
//!
//! [`TriageParams`] groups the static parameters that bound the interview
//! loop in [`RunTriageUseCase`](crate::use_cases::run_triage::RunTriageUseCase).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on Question → Interaction → Diagnosis rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 5;

/// Interview loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageParams {
    /// Maximum interview rounds before the session ends inconclusive.
    pub max_rounds: usize,
    /// How long to wait for the patient before the session is abandoned.
    pub answer_timeout: Option<Duration>,
    /// Limit for each provider call (acquire, analyze, ask, evaluate).
    pub provider_timeout: Option<Duration>,
}

impl Default for TriageParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            answer_timeout: None,
            provider_timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl TriageParams {
    // ==================== Builder Methods ====================

    /// Set the round cap. Values below 1 are raised to 1.
    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub fn with_answer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = TriageParams::default();
        assert_eq!(params.max_rounds, 5);
        assert!(params.answer_timeout.is_none());
        assert_eq!(params.provider_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_builder() {
        let params = TriageParams::default()
            .with_max_rounds(3)
            .with_answer_timeout(Some(Duration::from_secs(120)))
            .with_provider_timeout(None);

        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.answer_timeout, Some(Duration::from_secs(120)));
        assert!(params.provider_timeout.is_none());
    }

    #[test]
    fn test_zero_rounds_clamped() {
        assert_eq!(TriageParams::default().with_max_rounds(0).max_rounds, 1);
    }
}
