//! Interview history value objects

use serde::{Deserialize, Serialize};

/// A patient's answer to an interview question (Value Object)
///
/// Never empty: whitespace-only input is rejected so the interaction step can
/// re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    content: String,
}

impl Answer {
    /// Try to create an answer, returning None for empty or whitespace-only input
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// One completed interview round: the question asked and the answer given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, answer: &Answer) -> Self {
        Self {
            question: question.into(),
            answer: answer.content().to_string(),
        }
    }

    /// Render as the two-line `Q: ... / A: ...` block given to the agents
    pub fn render(&self) -> String {
        format!("Q: {}\nA: {}", self.question, self.answer)
    }
}

/// Append-only, chronologically ordered interview log
///
/// Only [`TriageSession`](super::entities::TriageSession) can append; entries
/// are never reordered or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewHistory {
    entries: Vec<HistoryEntry>,
}

impl InterviewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Render the whole log as one text block, entries joined in log order.
    ///
    /// Empty string when no round has completed. Pure function of the entries.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
