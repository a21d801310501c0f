//! Triage session domain
//!
//! The [`TriageSession`](entities::TriageSession) is the single record threaded
//! through a run. Only the orchestrator mutates it; agents see read-only
//! projections (findings, history text, the pending question).

pub mod entities;
pub mod history;
pub mod status;
