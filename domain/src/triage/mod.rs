//! Triage decision domain
//!
//! - [`assessment::ReferralAssessment`]: structured diagnostician result
//! - [`level::TriageLevel`]: Red / Yellow / Green severity
//! - [`outcome::TriageOutcome`]: terminal value of a session
//! - [`phase::TriagePhase`]: workflow steps

pub mod assessment;
pub mod level;
pub mod outcome;
pub mod phase;
