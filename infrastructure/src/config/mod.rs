//! Configuration file loading for visionlink
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed with `VISIONLINK_`
//! 2. `--config <path>` specified file
//! 3. Project root: `./visionlink.toml` or `./.visionlink.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/visionlink/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    CATALOG_LABELS, DEFAULT_OBSERVER_MODEL, DEFAULT_TEXT_MODEL, FileCatalogConfig, FileConfig,
    FileLoggingConfig, FileModelsConfig, FileOllamaConfig, FileOutputConfig, FileOutputFormat,
    FileProvidersConfig, FileTriageConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
