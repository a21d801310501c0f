//! Infrastructure layer for visionlink
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Ollama-backed agents, placeholder
//! providers, the example catalog, JSONL transcripts and configuration
//! file loading.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod ollama;
pub mod providers;

// Re-export commonly used types
pub use catalog::{CatalogEntry, CatalogError, ExampleCatalog};
pub use config::{
    ConfigLoader, FileCatalogConfig, FileConfig, FileLoggingConfig, FileModelsConfig,
    FileOllamaConfig, FileOutputConfig, FileOutputFormat, FileTriageConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use ollama::{
    ModelResidency, OllamaClient, OllamaDiagnostician, OllamaError, OllamaInvestigator,
    OllamaObserver,
};
pub use providers::{
    CatalogFindingsProvider, PLACEHOLDER_LABEL, PlaceholderDiagnostician, PlaceholderInvestigator,
};
