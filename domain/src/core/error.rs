//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Visual findings already recorded for this session")]
    FindingsAlreadyRecorded,

    #[error("Visual findings are empty")]
    EmptyFindings,

    #[error("Visual findings have not been recorded")]
    FindingsMissing,

    #[error("Empty answer")]
    EmptyAnswer,

    #[error("No question awaiting an answer")]
    NoPendingQuestion,
}

impl DomainError {
    /// Check if this error is a session-construction failure
    pub fn is_invalid_session(&self) -> bool {
        matches!(self, DomainError::InvalidSession(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let error = DomainError::InvalidTransition {
            from: "terminated".to_string(),
            to: "continue".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: terminated -> continue"
        );
    }

    #[test]
    fn test_is_invalid_session_check() {
        assert!(DomainError::InvalidSession("missing".to_string()).is_invalid_session());
        assert!(!DomainError::EmptyAnswer.is_invalid_session());
        assert!(!DomainError::NoPendingQuestion.is_invalid_session());
    }
}
