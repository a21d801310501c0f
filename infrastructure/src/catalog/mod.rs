//! Example scan catalog
//!
//! A JSON file mapping condition labels to annotated scans:
//!
//! ```json
//! {
//!   "D": [
//!     { "image_path": "images/0_left.jpg", "label": "D",
//!       "keywords": "moderate non proliferative retinopathy" }
//!   ],
//!   "G": []
//! }
//! ```
//!
//! Labels: N (normal), D (diabetic retinopathy), G (glaucoma), C (cataract),
//! A (age-related macular degeneration), H (hypertension), M (myopia),
//! O (other).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No example scans for label '{0}'")]
    NoExamples(String),
}

/// One annotated scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub image_path: String,
    pub label: String,
    /// Grader's diagnostic keywords for this eye
    #[serde(default)]
    pub keywords: String,
}

/// Annotated example scans grouped by condition label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleCatalog {
    entries: BTreeMap<String, Vec<CatalogEntry>>,
}

impl ExampleCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Self =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            labels = catalog.entries.len(),
            scans = catalog.len(),
            "Example catalog loaded"
        );
        Ok(catalog)
    }

    /// First scan for `label` (case-insensitive)
    pub fn first(&self, label: &str) -> Result<&CatalogEntry, CatalogError> {
        let label = label.trim().to_uppercase();
        self.entries
            .get(&label)
            .and_then(|entries| entries.first())
            .ok_or(CatalogError::NoExamples(label))
    }

    /// Entry whose image path matches `image`, by full path or file name
    pub fn find_by_image(&self, image: &Path) -> Option<&CatalogEntry> {
        let all = || self.entries.values().flatten();
        all()
            .find(|entry| Path::new(&entry.image_path) == image)
            .or_else(|| {
                let name = image.file_name()?;
                all().find(|entry| Path::new(&entry.image_path).file_name() == Some(name))
            })
    }

    /// Labels that have at least one scan
    pub fn labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Total number of scans
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
