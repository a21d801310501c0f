//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod findings_provider;
pub mod interaction_channel;
pub mod progress;
pub mod provider_error;
pub mod question_provider;
pub mod referral_provider;
pub mod transcript_logger;
