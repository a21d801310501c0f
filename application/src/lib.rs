//! Application layer for visionlink
//!
//! This crate contains the triage orchestrator, its port definitions, and
//! the interview loop parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::TriageParams;
pub use ports::{
    findings_provider::FindingsProvider,
    interaction_channel::{InteractionChannel, InteractionError, ScriptedInteraction},
    progress::{NoProgress, TriageProgressNotifier},
    provider_error::ProviderError,
    question_provider::{NextQuestion, QuestionProvider},
    referral_provider::ReferralProvider,
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::run_triage::{RunTriageError, RunTriageInput, RunTriageUseCase};
