//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use visionlink_domain::{ConfigIssue, ConfigIssueCode};

/// Ollama inference server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Server address (default: "http://localhost:11434").
    pub base_url: String,
    /// Max tokens per response, sent as `num_predict`.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            max_tokens: 512,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub ollama: FileOllamaConfig,
}

impl FileProvidersConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let ollama = &self.ollama;

        if !(ollama.base_url.starts_with("http://") || ollama.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidUrl {
                    field: "providers.ollama.base_url".to_string(),
                },
                format!(
                    "providers.ollama.base_url: '{}' must start with http:// or https://",
                    ollama.base_url
                ),
            ));
        }

        if ollama.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "providers.ollama.max_tokens".to_string(),
                },
                "providers.ollama.max_tokens: must be at least 1",
            ));
        }

        if !(0.0..=2.0).contains(&ollama.temperature) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "providers.ollama.temperature".to_string(),
                },
                format!(
                    "providers.ollama.temperature: {} is outside 0.0..=2.0",
                    ollama.temperature
                ),
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FileProvidersConfig::default().validate().is_empty());
    }

    #[test]
    fn test_bad_url_and_temperature() {
        let config = FileProvidersConfig {
            ollama: FileOllamaConfig {
                base_url: "localhost:11434".to_string(),
                temperature: 3.5,
                ..Default::default()
            },
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].is_error());
        assert!(!issues[1].is_error());
    }
}
