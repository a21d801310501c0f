//! Progress notification port
//!
//! Defines the interface for reporting progress during a triage session.

use visionlink_domain::{ReferralAssessment, TriagePhase};

/// Callback for progress updates during a triage session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait TriageProgressNotifier: Send + Sync {
    /// Called when a phase starts. `round` is 0 for the findings phase.
    fn on_phase_start(&self, phase: TriagePhase, round: usize);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: TriagePhase, success: bool);

    // ==================== Content Callbacks ====================

    /// Called once the Observer's findings are recorded.
    fn on_findings(&self, _findings: &str) {}

    /// Called when the Investigator's question for `round` is known.
    fn on_question(&self, _round: usize, _question: &str) {}

    /// Called after each diagnostician pass.
    fn on_assessment(&self, _round: usize, _assessment: &ReferralAssessment) {}

    /// Called when a phase switches to its placeholder provider.
    fn on_fallback(&self, _phase: TriagePhase, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TriageProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: TriagePhase, _round: usize) {}
    fn on_phase_complete(&self, _phase: TriagePhase, _success: bool) {}
}
