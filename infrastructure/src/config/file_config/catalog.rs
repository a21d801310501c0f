//! Example catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use visionlink_domain::{ConfigIssue, ConfigIssueCode};

/// Condition labels used by the example catalog.
pub const CATALOG_LABELS: [&str; 8] = ["N", "D", "G", "C", "A", "H", "M", "O"];

/// Raw catalog configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Path to the examples JSON file
    pub path: PathBuf,
    /// Label used when neither an image nor `--example` is given
    pub default_label: String,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("few_shot_examples.json"),
            default_label: "D".to_string(),
        }
    }
}

impl FileCatalogConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let label = self.default_label.trim().to_uppercase();
        if CATALOG_LABELS.contains(&label.as_str()) {
            return Vec::new();
        }
        vec![ConfigIssue::error(
            ConfigIssueCode::InvalidEnumValue {
                field: "catalog.default_label".to_string(),
                value: self.default_label.clone(),
                valid_values: CATALOG_LABELS.iter().map(|l| l.to_string()).collect(),
            },
            format!(
                "catalog.default_label: unknown label '{}'",
                self.default_label
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_case_insensitive() {
        let config = FileCatalogConfig {
            default_label: "g".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unknown_label() {
        let config = FileCatalogConfig {
            default_label: "X".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidEnumValue { .. }
        ));
    }
}
