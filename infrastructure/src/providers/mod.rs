//! Provider adapters that need no inference server

pub mod catalog_findings;
pub mod placeholder;

pub use catalog_findings::CatalogFindingsProvider;
pub use placeholder::{PLACEHOLDER_LABEL, PlaceholderDiagnostician, PlaceholderInvestigator};
