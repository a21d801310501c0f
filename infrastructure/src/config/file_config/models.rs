//! Role-based model configuration from TOML (`[models]` section)

use serde::{Deserialize, Serialize};
use visionlink_domain::{ConfigIssue, ConfigIssueCode};

pub const DEFAULT_OBSERVER_MODEL: &str = "llava:7b";
pub const DEFAULT_TEXT_MODEL: &str = "gemma2:2b";

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// observer = "llava:7b"          # Vision model, reads the scan
/// investigator = "gemma2:2b"     # Asks the patient follow-up questions
/// diagnostician = "gemma2:2b"    # Writes the referral
/// ```
///
/// Investigator and diagnostician may share a model; it is then loaded once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub observer: String,
    pub investigator: String,
    pub diagnostician: String,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            observer: DEFAULT_OBSERVER_MODEL.to_string(),
            investigator: DEFAULT_TEXT_MODEL.to_string(),
            diagnostician: DEFAULT_TEXT_MODEL.to_string(),
        }
    }
}

impl FileModelsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("observer", &self.observer),
            ("investigator", &self.investigator),
            ("diagnostician", &self.diagnostician),
        ]
        .into_iter()
        .filter(|(_, name)| name.trim().is_empty())
        .map(|(field, _)| {
            ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: format!("models.{}", field),
                },
                format!("models.{}: model name cannot be empty", field),
            )
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_names_are_errors() {
        let config = FileModelsConfig {
            observer: "  ".to_string(),
            investigator: String::new(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::EmptyModelName {
                field: "models.observer".to_string()
            }
        );
    }
}
