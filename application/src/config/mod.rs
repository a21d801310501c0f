//! Application-level configuration.
//!
//! - [`TriageParams`]: interview loop control (round cap, timeouts)

pub mod triage_params;

pub use triage_params::{DEFAULT_MAX_ROUNDS, TriageParams};
