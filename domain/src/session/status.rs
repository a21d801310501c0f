//! Session status machine

use serde::{Deserialize, Serialize};

/// Control-flow status of a [`TriageSession`](super::entities::TriageSession)
///
/// Transitions are monotonic along
/// `Started -> (AwaitingAnswer <-> Continue)* -> Terminated`.
/// Findings-done and answered are implicit sub-states that do not change
/// the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session created, findings not yet requested
    #[default]
    Started,
    /// A question has been generated and waits for the patient's answer
    AwaitingAnswer,
    /// The diagnostician asked for more information; another round follows
    Continue,
    /// Final state, no further transitions
    Terminated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Started => "started",
            SessionStatus::AwaitingAnswer => "awaiting_answer",
            SessionStatus::Continue => "continue",
            SessionStatus::Terminated => "terminated",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SessionStatus::Started => "Started",
            SessionStatus::AwaitingAnswer => "Awaiting Answer",
            SessionStatus::Continue => "Continue",
            SessionStatus::Terminated => "Terminated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Terminated)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// `Continue -> Terminated` is the forced stop at the round cap.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Started, AwaitingAnswer)
                | (AwaitingAnswer, Continue)
                | (AwaitingAnswer, Terminated)
                | (Continue, AwaitingAnswer)
                | (Continue, Terminated)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus::*;

    #[test]
    fn test_default_is_started() {
        assert_eq!(SessionStatus::default(), Started);
    }

    #[test]
    fn test_loop_transitions_allowed() {
        assert!(Started.can_transition_to(AwaitingAnswer));
        assert!(AwaitingAnswer.can_transition_to(Continue));
        assert!(Continue.can_transition_to(AwaitingAnswer));
        assert!(AwaitingAnswer.can_transition_to(Terminated));
        assert!(Continue.can_transition_to(Terminated));
    }

    #[test]
    fn test_terminated_is_final() {
        for next in [Started, AwaitingAnswer, Continue, Terminated] {
            assert!(!Terminated.can_transition_to(next));
        }
        assert!(Terminated.is_terminal());
        assert!(!Continue.is_terminal());
    }

    #[test]
    fn test_no_backwards_or_skipping() {
        assert!(!AwaitingAnswer.can_transition_to(Started));
        assert!(!Started.can_transition_to(Terminated));
        assert!(!Started.can_transition_to(Continue));
        assert!(!AwaitingAnswer.can_transition_to(AwaitingAnswer));
    }

    #[test]
    fn test_serialize_snake_case() {
        let json = serde_json::to_string(&AwaitingAnswer).unwrap();
        assert_eq!(json, "\"awaiting_answer\"");
    }
}
