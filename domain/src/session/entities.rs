//! Triage session entity

use super::history::{Answer, HistoryEntry, InterviewHistory};
use super::status::SessionStatus;
use crate::core::error::DomainError;
use crate::core::image::ImageReference;
use crate::triage::assessment::ReferralAssessment;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier for a triage session, used in logs and transcript file names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id: local timestamp plus a process-wide counter
    pub fn generate() -> Self {
        let seq = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S");
        Self(format!("triage-{}-{}", stamp, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One patient encounter (Entity)
///
/// Tracks the state of a triage run from image intake to the final
/// referral. Every mutation goes through a method that enforces the status
/// machine in [`SessionStatus::can_transition_to`].
///
/// Serialize-only, so a session can never be rebuilt in a state the status
/// machine did not produce:
///
/// ```compile_fail
/// let _: visionlink_domain::TriageSession = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TriageSession {
    id: SessionId,
    image: ImageReference,
    visual_findings: Option<String>,
    history: InterviewHistory,
    last_question: Option<String>,
    /// True while `last_question` has not been answered yet
    question_pending: bool,
    referral_report: Option<String>,
    status: SessionStatus,
    degraded: bool,
}

impl TriageSession {
    /// Start a session for the given scan.
    ///
    /// Fails with [`DomainError::InvalidSession`] when the reference is empty.
    pub fn new(image_reference: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_id(SessionId::generate(), image_reference)
    }

    pub fn with_id(id: SessionId, image_reference: impl Into<String>) -> Result<Self, DomainError> {
        let image = ImageReference::try_new(image_reference).ok_or_else(|| {
            DomainError::InvalidSession("an image reference is required".to_string())
        })?;
        Ok(Self {
            id,
            image,
            visual_findings: None,
            history: InterviewHistory::new(),
            last_question: None,
            question_pending: false,
            referral_report: None,
            status: SessionStatus::Started,
            degraded: false,
        })
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    pub fn visual_findings(&self) -> Option<&str> {
        self.visual_findings.as_deref()
    }

    pub fn history(&self) -> &InterviewHistory {
        &self.history
    }

    /// History rendered as the text block handed to the agents
    pub fn history_text(&self) -> String {
        self.history.render()
    }

    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    pub fn referral_report(&self) -> Option<&str> {
        self.referral_report.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn rounds_completed(&self) -> usize {
        self.history.len()
    }

    /// True when placeholder output was used anywhere in this session
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    // ==================== Mutations ====================

    /// Record the Observer's findings. Allowed exactly once.
    pub fn record_findings(&mut self, findings: impl Into<String>) -> Result<(), DomainError> {
        if self.visual_findings.is_some() {
            return Err(DomainError::FindingsAlreadyRecorded);
        }
        let findings = findings.into();
        if findings.trim().is_empty() {
            return Err(DomainError::EmptyFindings);
        }
        self.visual_findings = Some(findings);
        Ok(())
    }

    /// Set the question for the next round and wait for an answer.
    pub fn ask(&mut self, question: impl Into<String>) -> Result<(), DomainError> {
        if self.visual_findings.is_none() {
            return Err(DomainError::FindingsMissing);
        }
        self.transition(SessionStatus::AwaitingAnswer)?;
        self.last_question = Some(question.into());
        self.question_pending = true;
        Ok(())
    }

    /// Append the answer to the pending question as one history entry.
    pub fn record_answer(&mut self, answer: &Answer) -> Result<&HistoryEntry, DomainError> {
        if self.status != SessionStatus::AwaitingAnswer || !self.question_pending {
            return Err(DomainError::NoPendingQuestion);
        }
        let question = self
            .last_question
            .clone()
            .ok_or(DomainError::NoPendingQuestion)?;
        self.history.push(HistoryEntry::new(question, answer));
        self.question_pending = false;
        self.history.last().ok_or(DomainError::NoPendingQuestion)
    }

    /// Store the diagnostician's report and move to `Continue` or `Terminated`.
    ///
    /// Requires the current round's answer to have been recorded.
    pub fn record_referral(
        &mut self,
        assessment: &ReferralAssessment,
    ) -> Result<SessionStatus, DomainError> {
        if self.status != SessionStatus::AwaitingAnswer || self.question_pending {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: "diagnosis".to_string(),
            });
        }
        let next = if assessment.is_complete() {
            SessionStatus::Terminated
        } else {
            SessionStatus::Continue
        };
        self.transition(next)?;
        self.referral_report = Some(assessment.report().to_string());
        Ok(next)
    }

    /// Forced stop at the round cap: `Continue -> Terminated`.
    pub fn terminate_inconclusive(&mut self) -> Result<(), DomainError> {
        if self.status != SessionStatus::Continue {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: SessionStatus::Terminated.as_str().to_string(),
            });
        }
        self.transition(SessionStatus::Terminated)
    }

    pub fn mark_degraded(&mut self) {
        self.degraded = true;
    }

    fn transition(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(s: &str) -> Answer {
        Answer::try_new(s).unwrap()
    }

    fn session_with_findings() -> TriageSession {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        session.record_findings("mild disc blurring").unwrap();
        session
    }

    #[test]
    fn test_serializes_for_output() {
        let mut session = session_with_findings();
        session.ask("sudden or gradual?").unwrap();
        session.record_answer(&answer("gradual")).unwrap();

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["visual_findings"], "mild disc blurring");
        assert_eq!(value["status"], serde_json::to_value(SessionStatus::AwaitingAnswer).unwrap());
        assert_eq!(value["history"][0]["answer"], "gradual");
    }

    #[test]
    fn test_new_requires_image_reference() {
        let err = TriageSession::new("  ").unwrap_err();
        assert!(err.is_invalid_session());
    }

    #[test]
    fn test_new_defaults() {
        let session = TriageSession::new("scan1.jpg").unwrap();
        assert_eq!(session.status(), SessionStatus::Started);
        assert_eq!(session.image().as_str(), "scan1.jpg");
        assert!(session.visual_findings().is_none());
        assert!(session.history().is_empty());
        assert!(session.last_question().is_none());
        assert!(session.referral_report().is_none());
        assert!(!session.is_degraded());
        assert!(session.id().as_str().starts_with("triage-"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_findings_written_once() {
        let mut session = session_with_findings();
        assert_eq!(
            session.record_findings("again"),
            Err(DomainError::FindingsAlreadyRecorded)
        );
        assert_eq!(session.visual_findings(), Some("mild disc blurring"));
    }

    #[test]
    fn test_empty_findings_rejected() {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        assert_eq!(session.record_findings(" "), Err(DomainError::EmptyFindings));
    }

    #[test]
    fn test_ask_requires_findings() {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        assert_eq!(session.ask("q?"), Err(DomainError::FindingsMissing));
    }

    #[test]
    fn test_full_round_continue_then_terminate() {
        let mut session = session_with_findings();

        session.ask("sudden or gradual?").unwrap();
        assert_eq!(session.status(), SessionStatus::AwaitingAnswer);
        session.record_answer(&answer("gradual")).unwrap();
        let status = session
            .record_referral(&ReferralAssessment::insufficient("insufficient info"))
            .unwrap();
        assert_eq!(status, SessionStatus::Continue);

        session.ask("how long?").unwrap();
        session.record_answer(&answer("3 months")).unwrap();
        let status = session
            .record_referral(&ReferralAssessment::complete("TRIAGE: Green."))
            .unwrap();
        assert_eq!(status, SessionStatus::Terminated);
        assert_eq!(session.rounds_completed(), 2);
        assert_eq!(session.referral_report(), Some("TRIAGE: Green."));
    }

    #[test]
    fn test_answer_without_question_rejected() {
        let mut session = session_with_findings();
        assert_eq!(
            session.record_answer(&answer("yes")).unwrap_err(),
            DomainError::NoPendingQuestion
        );
    }

    #[test]
    fn test_question_answered_only_once() {
        let mut session = session_with_findings();
        session.ask("q?").unwrap();
        session.record_answer(&answer("a")).unwrap();
        assert!(session.record_answer(&answer("b")).is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_referral_before_answer_rejected() {
        let mut session = session_with_findings();
        session.ask("q?").unwrap();
        assert!(
            session
                .record_referral(&ReferralAssessment::complete("done"))
                .is_err()
        );
        assert_eq!(session.status(), SessionStatus::AwaitingAnswer);
    }

    #[test]
    fn test_no_resume_after_terminated() {
        let mut session = session_with_findings();
        session.ask("q?").unwrap();
        session.record_answer(&answer("a")).unwrap();
        session
            .record_referral(&ReferralAssessment::complete("done"))
            .unwrap();
        assert!(matches!(
            session.ask("another?"),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(session.terminate_inconclusive().is_err());
    }

    #[test]
    fn test_terminate_inconclusive_from_continue() {
        let mut session = session_with_findings();
        session.ask("q?").unwrap();
        session.record_answer(&answer("a")).unwrap();
        session
            .record_referral(&ReferralAssessment::insufficient("insufficient info"))
            .unwrap();
        session.terminate_inconclusive().unwrap();
        assert_eq!(session.status(), SessionStatus::Terminated);
    }
}
