//! Interview loop configuration from TOML (`[triage]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use visionlink_application::TriageParams;
use visionlink_application::config::DEFAULT_MAX_ROUNDS;
use visionlink_domain::{ConfigIssue, ConfigIssueCode};

/// Raw triage configuration from TOML
///
/// # Example
///
/// ```toml
/// [triage]
/// max_rounds = 5
/// answer_timeout_secs = 600      # omit to wait forever
/// provider_timeout_secs = 300    # 0 disables the limit
/// fallback_to_placeholder = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTriageConfig {
    /// Interview rounds before the session ends inconclusive
    pub max_rounds: usize,
    /// Seconds to wait for a patient answer
    pub answer_timeout_secs: Option<u64>,
    /// Seconds allowed for each provider call
    pub provider_timeout_secs: u64,
    /// Switch to labeled placeholder text when a text model fails
    pub fallback_to_placeholder: bool,
}

impl Default for FileTriageConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            answer_timeout_secs: None,
            provider_timeout_secs: 300,
            fallback_to_placeholder: true,
        }
    }
}

impl FileTriageConfig {
    /// Convert to application-layer parameters.
    pub fn to_params(&self) -> TriageParams {
        let provider_timeout = match self.provider_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        TriageParams::default()
            .with_max_rounds(self.max_rounds)
            .with_answer_timeout(
                self.answer_timeout_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            )
            .with_provider_timeout(provider_timeout)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "triage.max_rounds".to_string(),
                },
                "triage.max_rounds: must be at least 1",
            ));
        }

        if self.answer_timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "triage.answer_timeout_secs".to_string(),
                },
                "triage.answer_timeout_secs: 0 disables the timeout, omit the key instead",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params_defaults() {
        let params = FileTriageConfig::default().to_params();
        assert_eq!(params.max_rounds, 5);
        assert!(params.answer_timeout.is_none());
        assert_eq!(params.provider_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_to_params_zero_disables_limits() {
        let config = FileTriageConfig {
            answer_timeout_secs: Some(0),
            provider_timeout_secs: 0,
            ..Default::default()
        };
        let params = config.to_params();
        assert!(params.answer_timeout.is_none());
        assert!(params.provider_timeout.is_none());
    }

    #[test]
    fn test_validate_zero_rounds_is_error() {
        let config = FileTriageConfig {
            max_rounds: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
