//! Orchestrator phases

use serde::{Deserialize, Serialize};

/// Step of the triage workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriagePhase {
    /// Observer analyzes the scan (runs once)
    Findings,
    /// Investigator generates the next question
    Question,
    /// Patient answers the pending question
    Interaction,
    /// Diagnostician evaluates findings and history
    Diagnosis,
}

impl TriagePhase {
    pub fn as_str(&self) -> &str {
        match self {
            TriagePhase::Findings => "findings",
            TriagePhase::Question => "question",
            TriagePhase::Interaction => "interaction",
            TriagePhase::Diagnosis => "diagnosis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TriagePhase::Findings => "Observer: Visual Findings",
            TriagePhase::Question => "Investigator: Interview Question",
            TriagePhase::Interaction => "Patient Interaction",
            TriagePhase::Diagnosis => "Diagnostician: Referral",
        }
    }

    /// Coarse phase name shown to users when a session fails
    pub fn user_facing(&self) -> &str {
        match self {
            TriagePhase::Findings => "findings",
            TriagePhase::Question | TriagePhase::Interaction => "interview",
            TriagePhase::Diagnosis => "diagnosis",
        }
    }
}

impl std::fmt::Display for TriagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
