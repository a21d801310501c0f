//! Interaction channel port for collecting the patient's answers.
//!
//! # Architecture
//!
//! - **Port**: [`InteractionChannel`] - defined here in application layer
//! - **Adapter**: `ConsoleInteraction` - implemented in presentation layer
//!
//! # Built-in Implementations
//!
//! - [`ScriptedInteraction`] - Replays a fixed list of answers, then reports
//!   the channel as closed. Used for non-interactive runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised while waiting for the patient.
///
/// All of them end the session as abandoned; none is a crash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// No more input will arrive (EOF, closed form, script exhausted).
    #[error("Interaction channel closed")]
    Closed,
    /// The user cancelled (e.g. Ctrl+C).
    #[error("Interaction cancelled")]
    Cancelled,
    /// Terminal or transport failure.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for asking the patient a question.
///
/// Implementations block until the human responds. They may re-prompt on
/// their own; the orchestrator additionally re-asks whenever an empty or
/// whitespace-only answer comes back.
#[async_trait]
pub trait InteractionChannel: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, InteractionError>;

    /// Called before re-asking after an empty answer.
    fn on_empty_answer(&self) {}
}

/// Replays scripted answers in order.
pub struct ScriptedInteraction {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedInteraction {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

#[async_trait]
impl InteractionChannel for ScriptedInteraction {
    async fn ask(&self, _question: &str) -> Result<String, InteractionError> {
        let mut answers = self
            .answers
            .lock()
            .map_err(|e| InteractionError::Io(e.to_string()))?;
        answers.pop_front().ok_or(InteractionError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_interaction_replays_in_order() {
        let channel = ScriptedInteraction::new(["gradual", "3 months"]);
        assert_eq!(channel.ask("q1").await.unwrap(), "gradual");
        assert_eq!(channel.ask("q2").await.unwrap(), "3 months");
        assert_eq!(channel.remaining(), 0);
    }

    #[tokio::test]
    async fn test_scripted_interaction_closes_when_exhausted() {
        let channel = ScriptedInteraction::new(Vec::<String>::new());
        assert_eq!(channel.ask("q").await, Err(InteractionError::Closed));
    }
}
