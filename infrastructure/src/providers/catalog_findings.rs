//! Findings from the example catalog (demo mode)
//!
//! Serves the grader's diagnostic keywords recorded for a known scan instead
//! of running a vision model.

use crate::catalog::ExampleCatalog;
use async_trait::async_trait;
use std::sync::Arc;
use visionlink_application::{FindingsProvider, ProviderError};
use visionlink_domain::ImageReference;

pub struct CatalogFindingsProvider {
    catalog: Arc<ExampleCatalog>,
}

impl CatalogFindingsProvider {
    pub fn new(catalog: Arc<ExampleCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl FindingsProvider for CatalogFindingsProvider {
    fn name(&self) -> &str {
        "example catalog"
    }

    async fn analyze(&self, image: &ImageReference) -> Result<String, ProviderError> {
        let entry = self
            .catalog
            .find_by_image(image.as_path())
            .ok_or_else(|| ProviderError::InputNotFound(format!("{} is not in the catalog", image)))?;

        if entry.keywords.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(format!(
                "catalog entry for {} has no keywords",
                image.display_name()
            )));
        }
        Ok(format!("Diagnostic keywords: {}", entry.keywords.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CatalogFindingsProvider {
        let catalog: ExampleCatalog = serde_json::from_str(
            r#"{
                "D": [{ "image_path": "odir/0_left.jpg", "label": "D", "keywords": "moderate non proliferative retinopathy" }],
                "O": [{ "image_path": "odir/9_right.jpg", "label": "O", "keywords": "" }]
            }"#,
        )
        .unwrap();
        CatalogFindingsProvider::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_known_scan_returns_keywords() {
        let image = ImageReference::try_new("odir/0_left.jpg").unwrap();
        let findings = provider().analyze(&image).await.unwrap();
        assert_eq!(
            findings,
            "Diagnostic keywords: moderate non proliferative retinopathy"
        );
    }

    #[tokio::test]
    async fn test_unknown_scan_is_input_not_found() {
        let image = ImageReference::try_new("elsewhere/scan1.jpg").unwrap();
        assert!(matches!(
            provider().analyze(&image).await,
            Err(ProviderError::InputNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_entry_without_keywords_is_rejected() {
        let image = ImageReference::try_new("odir/9_right.jpg").unwrap();
        assert!(matches!(
            provider().analyze(&image).await,
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
