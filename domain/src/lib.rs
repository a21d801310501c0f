//! Domain layer for visionlink
//!
//! This crate contains the triage session entity, its status machine and the
//! value objects exchanged with the agents. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`TriageSession`] is one patient encounter: a scan is analyzed once by the
//! Observer, then the Investigator and the Diagnostician take turns until the
//! Diagnostician has enough information to write a referral.
//!
//! ## Triage Level
//!
//! - **Red**: emergency, immediate referral
//! - **Yellow**: urgent, specialist within 1-2 weeks
//! - **Green**: routine follow-up

pub mod config;
pub mod core;
pub mod prompt;
pub mod session;
pub mod triage;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, image::ImageReference, string::truncate};
pub use prompt::{NO_FURTHER_QUESTIONS, PromptTemplate};
pub use session::{
    entities::{SessionId, TriageSession},
    history::{Answer, HistoryEntry, InterviewHistory},
    status::SessionStatus,
};
pub use triage::{
    assessment::{INSUFFICIENT_INFO_SENTINEL, ReferralAssessment, contains_insufficient_sentinel},
    level::{TriageLevel, parse_triage_level},
    outcome::{TriageOutcome, TriageVerdict},
    phase::TriagePhase,
};
