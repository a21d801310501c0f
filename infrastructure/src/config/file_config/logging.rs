//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// dir = "~/.local/share/visionlink/logs"   # daily rolling operation log
/// transcript = true                          # per-session JSONL transcript in `dir`
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling log file and session transcripts
    pub dir: Option<PathBuf>,
    /// Write a JSONL transcript per session
    pub transcript: bool,
}

impl FileLoggingConfig {
    /// Directory with a leading `~` expanded to the home directory.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        match dir.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(dir.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_dir_plain() {
        let config = FileLoggingConfig {
            dir: Some(PathBuf::from("/var/log/visionlink")),
            transcript: false,
        };
        assert_eq!(
            config.resolved_dir(),
            Some(PathBuf::from("/var/log/visionlink"))
        );
    }

    #[test]
    fn test_resolved_dir_expands_home() {
        let config = FileLoggingConfig {
            dir: Some(PathBuf::from("~/logs")),
            transcript: true,
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.resolved_dir(), Some(home.join("logs")));
        }
    }

    #[test]
    fn test_no_dir() {
        assert!(FileLoggingConfig::default().resolved_dir().is_none());
    }
}
