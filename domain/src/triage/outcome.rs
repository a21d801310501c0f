//! Terminal result of a triage session

use super::level::{TriageLevel, parse_triage_level};
use crate::session::entities::TriageSession;
use serde::{Deserialize, Serialize};

/// How the session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum TriageVerdict {
    /// The diagnostician produced a final referral
    Concluded {
        report: String,
        /// Heuristically parsed from the report; `None` when no level was found
        level: Option<TriageLevel>,
    },
    /// The round cap was reached while the diagnostician still asked for more
    Inconclusive {
        rounds: usize,
        /// The diagnostician's notes from the last round
        last_report: Option<String>,
    },
}

/// Final value returned by the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct TriageOutcome {
    pub verdict: TriageVerdict,
    pub session: TriageSession,
}

impl TriageOutcome {
    /// Build a concluded outcome, parsing the level from the report text.
    pub fn concluded(session: TriageSession, report: impl Into<String>) -> Self {
        let report = report.into();
        let level = parse_triage_level(&report);
        Self {
            verdict: TriageVerdict::Concluded { report, level },
            session,
        }
    }

    pub fn inconclusive(session: TriageSession) -> Self {
        let rounds = session.rounds_completed();
        let last_report = session.referral_report().map(str::to_string);
        Self {
            verdict: TriageVerdict::Inconclusive {
                rounds,
                last_report,
            },
            session,
        }
    }

    pub fn is_conclusive(&self) -> bool {
        matches!(self.verdict, TriageVerdict::Concluded { .. })
    }

    /// The final referral report, if the session concluded
    pub fn report(&self) -> Option<&str> {
        match &self.verdict {
            TriageVerdict::Concluded { report, .. } => Some(report),
            TriageVerdict::Inconclusive { .. } => None,
        }
    }

    pub fn level(&self) -> Option<TriageLevel> {
        match &self.verdict {
            TriageVerdict::Concluded { level, .. } => *level,
            TriageVerdict::Inconclusive { .. } => None,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match &self.verdict {
            TriageVerdict::Concluded {
                level: Some(level), ..
            } => format!("Triage level: {} - {}", level, level.follow_up()),
            TriageVerdict::Concluded { level: None, .. } => {
                "Referral ready; triage level not stated in the report".to_string()
            }
            TriageVerdict::Inconclusive { rounds, .. } => format!(
                "Unable to reach a conclusive triage decision after {} rounds",
                rounds
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::history::Answer;
    use crate::triage::assessment::ReferralAssessment;

    fn played_session(final_assessment: ReferralAssessment) -> TriageSession {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        session.record_findings("mild disc blurring").unwrap();
        session.ask("how long?").unwrap();
        session
            .record_answer(&Answer::try_new("3 months").unwrap())
            .unwrap();
        session.record_referral(&final_assessment).unwrap();
        session
    }

    #[test]
    fn test_concluded_parses_level() {
        let report = "REFERRAL: Routine. TRIAGE: Green.";
        let session = played_session(ReferralAssessment::complete(report));
        let outcome = TriageOutcome::concluded(session, report);

        assert!(outcome.is_conclusive());
        assert_eq!(outcome.report(), Some(report));
        assert_eq!(outcome.level(), Some(TriageLevel::Green));
        assert_eq!(
            outcome.summary(),
            "Triage level: Green (Routine) - Routine follow-up"
        );
    }

    #[test]
    fn test_inconclusive_summary() {
        let mut session = played_session(ReferralAssessment::insufficient("insufficient info"));
        session.terminate_inconclusive().unwrap();
        let outcome = TriageOutcome::inconclusive(session);

        assert!(!outcome.is_conclusive());
        assert!(outcome.report().is_none());
        assert_eq!(
            outcome.verdict,
            TriageVerdict::Inconclusive {
                rounds: 1,
                last_report: Some("insufficient info".to_string()),
            }
        );
        assert_eq!(
            outcome.summary(),
            "Unable to reach a conclusive triage decision after 1 rounds"
        );
    }

    #[test]
    fn test_verdict_json_is_tagged() {
        let verdict = TriageVerdict::Concluded {
            report: "TRIAGE: Red".to_string(),
            level: Some(TriageLevel::Red),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["verdict"], "concluded");
        assert_eq!(json["level"], "red");
    }
}
