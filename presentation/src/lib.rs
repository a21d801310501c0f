//! Presentation layer for visionlink
//!
//! This crate contains the CLI definition, the console interaction channel,
//! progress reporters and output formatters.

pub mod cli;
pub mod config;
pub mod interaction;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::OutputConfig;
pub use interaction::ConsoleInteraction;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
