//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod catalog;
mod logging;
mod models;
mod output;
mod providers;
mod triage;

pub use catalog::{CATALOG_LABELS, FileCatalogConfig};
pub use logging::FileLoggingConfig;
pub use models::{DEFAULT_OBSERVER_MODEL, DEFAULT_TEXT_MODEL, FileModelsConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileOllamaConfig, FileProvidersConfig};
pub use triage::FileTriageConfig;

use serde::{Deserialize, Serialize};
use visionlink_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Interview loop settings
    pub triage: FileTriageConfig,
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Inference server settings
    pub providers: FileProvidersConfig,
    /// Example scan catalog
    pub catalog: FileCatalogConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Operation log and transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.triage.validate());
        issues.extend(self.models.validate());
        issues.extend(self.providers.validate());
        issues.extend(self.catalog.validate());

        if self.logging.transcript && self.logging.dir.is_none() {
            issues.push(ConfigIssue::warning(
                visionlink_domain::ConfigIssueCode::OutOfRange {
                    field: "logging.transcript".to_string(),
                },
                "logging.transcript: enabled but logging.dir is not set, transcripts go to the working directory",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionlink_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[triage]
max_rounds = 3
answer_timeout_secs = 120
fallback_to_placeholder = false

[models]
observer = "llava:13b"
investigator = "medgemma:4b"
diagnostician = "medgemma:4b"

[providers.ollama]
base_url = "http://gpu-box:11434"
temperature = 0.0

[catalog]
path = "/data/odir/few_shot_examples.json"
default_label = "G"

[output]
format = "report"
color = false

[logging]
dir = "/var/log/visionlink"
transcript = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.triage.max_rounds, 3);
        assert_eq!(config.triage.answer_timeout_secs, Some(120));
        assert!(!config.triage.fallback_to_placeholder);
        assert_eq!(config.models.observer, "llava:13b");
        assert_eq!(config.models.diagnostician, "medgemma:4b");
        assert_eq!(config.providers.ollama.base_url, "http://gpu-box:11434");
        assert_eq!(config.providers.ollama.max_tokens, 512);
        assert_eq!(config.catalog.default_label, "G");
        assert_eq!(config.output.format, Some(OutputFormat::Report));
        assert!(!config.output.color);
        assert!(config.logging.transcript);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[models]
observer = "bakllava"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.observer, "bakllava");
        // Defaults should apply
        assert_eq!(config.models.investigator, DEFAULT_TEXT_MODEL);
        assert_eq!(config.triage.max_rounds, 5);
        assert!(config.triage.fallback_to_placeholder);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[triage]
max_rounds = 0

[models]
diagnostician = ""

[catalog]
default_label = "Z"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.is_error()));
    }
}
