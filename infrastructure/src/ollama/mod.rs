//! Ollama inference server adapter
//!
//! Implements the three provider ports on top of a locally hosted Ollama
//! server: a multimodal Observer, and text-only Investigator and
//! Diagnostician. Model memory is managed through [`ModelResidency`] leases.

pub mod agents;
pub mod client;
pub mod error;
pub mod protocol;
pub mod residency;

pub use agents::{OllamaDiagnostician, OllamaInvestigator, OllamaObserver, parse_question};
pub use client::{ModelRuntime, OllamaClient};
pub use error::OllamaError;
pub use residency::ModelResidency;
