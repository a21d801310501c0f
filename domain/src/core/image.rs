//! Image reference value object

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference to the retinal scan a session evaluates (Value Object)
///
/// Opaque to the domain: usually a file path, but adapters may interpret it
/// as an upload handle or catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference {
    value: String,
}

impl ImageReference {
    /// Try to create a new reference, returning None if empty
    pub fn try_new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// View the reference as a filesystem path
    pub fn as_path(&self) -> &Path {
        Path::new(&self.value)
    }

    /// File name component, or the whole reference when it has none
    pub fn display_name(&self) -> &str {
        self.as_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.value)
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_empty() {
        assert!(ImageReference::try_new("").is_none());
        assert!(ImageReference::try_new("  \t").is_none());
    }

    #[test]
    fn test_try_new_valid() {
        let image = ImageReference::try_new("scans/scan1.jpg").unwrap();
        assert_eq!(image.as_str(), "scans/scan1.jpg");
        assert_eq!(image.display_name(), "scan1.jpg");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let image = ImageReference::try_new("scan1.jpg").unwrap();
        assert_eq!(serde_json::to_string(&image).unwrap(), "\"scan1.jpg\"");
    }
}
