//! Run Triage use case
//!
//! Orchestrates one triage session. The Observer runs once, then the
//! Investigator, the patient and the Diagnostician take turns until the
//! Diagnostician can write a referral or the round cap is reached.
//!
//! ```text
//! Findings ──▶ Question ──▶ Interaction ──▶ Diagnosis ──▶ done
//!                 ▲                             │
//!                 └──────── insufficient ───────┘
//! ```
//!
//! # Resources
//!
//! The findings provider is released as soon as `analyze` returns, so the
//! vision model is never resident during the interview. The question and
//! referral providers are acquired before round 1 and released once, when
//! the session ends, whatever the outcome.

use crate::config::TriageParams;
use crate::ports::findings_provider::FindingsProvider;
use crate::ports::interaction_channel::{InteractionChannel, InteractionError};
use crate::ports::progress::{NoProgress, TriageProgressNotifier};
use crate::ports::question_provider::{NextQuestion, QuestionProvider};
use crate::ports::referral_provider::ReferralProvider;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use serde_json::{Value, json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use visionlink_domain::core::string::preview;
use visionlink_domain::{
    Answer, DomainError, ReferralAssessment, SessionId, SessionStatus, TriageOutcome, TriagePhase,
    TriageSession,
};

/// Errors that end a triage session without an outcome
#[derive(Error, Debug)]
pub enum RunTriageError {
    #[error("Invalid session: {0}")]
    InvalidSession(DomainError),

    #[error("Findings unavailable: {0}")]
    FindingsUnavailable(String),

    #[error("Question unavailable: {0}")]
    QuestionUnavailable(String),

    #[error("Referral unavailable: {0}")]
    ReferralUnavailable(String),

    #[error("Session abandoned during {}: {reason}", .phase.as_str())]
    Abandoned { phase: TriagePhase, reason: String },

    #[error("Session state error: {0}")]
    State(#[from] DomainError),
}

impl RunTriageError {
    /// The phase that failed, if the error belongs to one
    pub fn phase(&self) -> Option<TriagePhase> {
        match self {
            RunTriageError::FindingsUnavailable(_) => Some(TriagePhase::Findings),
            RunTriageError::QuestionUnavailable(_) => Some(TriagePhase::Question),
            RunTriageError::ReferralUnavailable(_) => Some(TriagePhase::Diagnosis),
            RunTriageError::Abandoned { phase, .. } => Some(*phase),
            RunTriageError::InvalidSession(_) | RunTriageError::State(_) => None,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, RunTriageError::Abandoned { .. })
    }
}

/// Input for the RunTriage use case
#[derive(Debug, Clone)]
pub struct RunTriageInput {
    /// The scan to evaluate
    pub image_reference: String,
    /// Use this id instead of generating one
    pub session_id: Option<SessionId>,
}

impl RunTriageInput {
    pub fn new(image_reference: impl Into<String>) -> Self {
        Self {
            image_reference: image_reference.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, id: SessionId) -> Self {
        self.session_id = Some(id);
        self
    }
}

/// Use case for running a triage session
pub struct RunTriageUseCase {
    findings: Arc<dyn FindingsProvider>,
    questions: Arc<dyn QuestionProvider>,
    referrals: Arc<dyn ReferralProvider>,
    interaction: Arc<dyn InteractionChannel>,
    question_fallback: Option<Arc<dyn QuestionProvider>>,
    referral_fallback: Option<Arc<dyn ReferralProvider>>,
    transcript: Arc<dyn TranscriptLogger>,
    params: TriageParams,
}

impl RunTriageUseCase {
    pub fn new(
        findings: Arc<dyn FindingsProvider>,
        questions: Arc<dyn QuestionProvider>,
        referrals: Arc<dyn ReferralProvider>,
        interaction: Arc<dyn InteractionChannel>,
    ) -> Self {
        Self {
            findings,
            questions,
            referrals,
            interaction,
            question_fallback: None,
            referral_fallback: None,
            transcript: Arc::new(NoTranscriptLogger),
            params: TriageParams::default(),
        }
    }

    pub fn with_params(mut self, params: TriageParams) -> Self {
        self.params = params;
        self
    }

    /// Placeholder used when the question provider fails.
    pub fn with_question_fallback(mut self, fallback: Arc<dyn QuestionProvider>) -> Self {
        self.question_fallback = Some(fallback);
        self
    }

    /// Placeholder used when the referral provider fails.
    pub fn with_referral_fallback(mut self, fallback: Arc<dyn ReferralProvider>) -> Self {
        self.referral_fallback = Some(fallback);
        self
    }

    pub fn with_transcript_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = logger;
        self
    }

    pub fn params(&self) -> &TriageParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, input: RunTriageInput) -> Result<TriageOutcome, RunTriageError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Cancelling `cancel` abandons the session at the next step boundary or
    /// inside a pending call; held resources are released before returning.
    pub async fn execute_with_progress(
        &self,
        input: RunTriageInput,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<TriageOutcome, RunTriageError> {
        let mut session = match input.session_id {
            Some(id) => TriageSession::with_id(id, input.image_reference),
            None => TriageSession::new(input.image_reference),
        }
        .map_err(RunTriageError::InvalidSession)?;

        info!(
            session = %session.id(),
            image = %session.image(),
            max_rounds = self.params.max_rounds,
            "Starting triage session"
        );
        self.record(
            "session_started",
            json!({
                "session": session.id().as_str(),
                "image": session.image().as_str(),
                "max_rounds": self.params.max_rounds,
            }),
        );

        match self.run_session(&mut session, progress, cancel).await {
            Ok(concluded) => {
                let outcome = if concluded {
                    let report = session.referral_report().unwrap_or_default().to_string();
                    TriageOutcome::concluded(session, report)
                } else {
                    TriageOutcome::inconclusive(session)
                };
                info!(
                    session = %outcome.session.id(),
                    rounds = outcome.session.rounds_completed(),
                    degraded = outcome.session.is_degraded(),
                    "{}",
                    outcome.summary()
                );
                self.record(
                    "session_finished",
                    json!({
                        "session": outcome.session.id().as_str(),
                        "outcome": serde_json::to_value(&outcome.verdict).unwrap_or(Value::Null),
                        "rounds": outcome.session.rounds_completed(),
                        "degraded": outcome.session.is_degraded(),
                    }),
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(session = %session.id(), error = %e, "Triage session failed");
                self.record(
                    "session_failed",
                    json!({
                        "session": session.id().as_str(),
                        "phase": e.phase().map(|p| p.as_str().to_string()),
                        "error": e.to_string(),
                        "rounds": session.rounds_completed(),
                    }),
                );
                Err(e)
            }
        }
    }

    /// Run every step. Returns `true` when a referral was concluded.
    async fn run_session(
        &self,
        session: &mut TriageSession,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<bool, RunTriageError> {
        self.phase_findings(session, progress, cancel).await?;

        let mut agents = TextAgents {
            questions: Arc::clone(&self.questions),
            referrals: Arc::clone(&self.referrals),
            question_fallback: self.question_fallback.clone(),
            referral_fallback: self.referral_fallback.clone(),
            held: Vec::new(),
        };
        let result = self
            .run_interview(session, &mut agents, progress, cancel)
            .await;
        agents.release_all().await;
        debug!(session = %session.id(), "Text providers released");
        result
    }

    // ==================== Findings ====================

    async fn phase_findings(
        &self,
        session: &mut TriageSession,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(), RunTriageError> {
        info!(session = %session.id(), provider = self.findings.name(), "Phase: findings");
        progress.on_phase_start(TriagePhase::Findings, 0);

        let result = self.analyze_scan(session, cancel).await;
        progress.on_phase_complete(TriagePhase::Findings, result.is_ok());
        result?;

        let findings = session.visual_findings().unwrap_or_default();
        info!(findings = %preview(findings, 120), "Visual findings recorded");
        progress.on_findings(findings);
        self.record("findings", json!({ "text": findings }));
        Ok(())
    }

    async fn analyze_scan(
        &self,
        session: &mut TriageSession,
        cancel: &CancellationToken,
    ) -> Result<(), RunTriageError> {
        let limit = self.params.provider_timeout;
        run_step(self.findings.acquire(), limit, cancel)
            .await
            .map_err(Self::findings_error)?;

        let analyzed = run_step(self.findings.analyze(session.image()), limit, cancel).await;
        self.findings.release().await;
        debug!(provider = self.findings.name(), "Findings provider released");

        let findings = analyzed.map_err(Self::findings_error)?;
        session
            .record_findings(findings.trim())
            .map_err(|e| RunTriageError::FindingsUnavailable(e.to_string()))
    }

    fn findings_error(failure: StepFailure) -> RunTriageError {
        match failure {
            StepFailure::Cancelled => RunTriageError::Abandoned {
                phase: TriagePhase::Findings,
                reason: "cancelled".to_string(),
            },
            StepFailure::Failed(reason) => RunTriageError::FindingsUnavailable(reason),
        }
    }

    // ==================== Interview loop ====================

    async fn run_interview(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<bool, RunTriageError> {
        self.acquire_text_agents(session, agents, progress, cancel)
            .await?;

        loop {
            let round = session.rounds_completed() + 1;

            // Question
            progress.on_phase_start(TriagePhase::Question, round);
            let next = self
                .next_question(session, agents, progress, cancel)
                .await;
            progress.on_phase_complete(TriagePhase::Question, next.is_ok());
            let question = match next? {
                NextQuestion::Ask(question) => question,
                NextQuestion::Stop => {
                    info!(round, "Investigator has no further questions");
                    session.terminate_inconclusive()?;
                    return Ok(false);
                }
            };
            session.ask(question.as_str())?;
            info!(round, question = %preview(&question, 120), "Question generated");
            progress.on_question(round, &question);
            self.record(
                "question",
                json!({ "round": round, "text": question, "provider": agents.questions.name() }),
            );

            // Interaction
            let answer = self
                .collect_answer(&question, round, progress, cancel)
                .await?;
            session.record_answer(&answer)?;
            self.record("answer", json!({ "round": round, "text": answer.content() }));

            // Diagnosis
            progress.on_phase_start(TriagePhase::Diagnosis, round);
            let evaluated = self.assess(session, agents, progress, cancel).await;
            progress.on_phase_complete(TriagePhase::Diagnosis, evaluated.is_ok());
            let assessment = evaluated?;
            let status = session.record_referral(&assessment)?;
            progress.on_assessment(round, &assessment);
            self.record(
                "assessment",
                json!({
                    "round": round,
                    "complete": assessment.is_complete(),
                    "report": assessment.report(),
                    "provider": agents.referrals.name(),
                }),
            );

            if status == SessionStatus::Terminated {
                info!(round, "Referral ready");
                return Ok(true);
            }
            if session.rounds_completed() >= self.params.max_rounds {
                warn!(
                    rounds = session.rounds_completed(),
                    "Round cap reached without a conclusive referral"
                );
                session.terminate_inconclusive()?;
                return Ok(false);
            }
            debug!(round, "Insufficient information, looping back to the investigator");
        }
    }

    async fn acquire_text_agents(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(), RunTriageError> {
        let limit = self.params.provider_timeout;

        match run_step(agents.questions.acquire(), limit, cancel).await {
            Ok(()) => agents
                .held
                .push(Lease::Question(Arc::clone(&agents.questions))),
            Err(StepFailure::Cancelled) => return Err(abandoned(TriagePhase::Question)),
            Err(StepFailure::Failed(reason)) => {
                self.fall_back_question(session, agents, &reason, progress, cancel)
                    .await?
            }
        }

        match run_step(agents.referrals.acquire(), limit, cancel).await {
            Ok(()) => agents
                .held
                .push(Lease::Referral(Arc::clone(&agents.referrals))),
            Err(StepFailure::Cancelled) => return Err(abandoned(TriagePhase::Diagnosis)),
            Err(StepFailure::Failed(reason)) => {
                self.fall_back_referral(session, agents, &reason, progress, cancel)
                    .await?
            }
        }

        Ok(())
    }

    // ==================== Question ====================

    async fn next_question(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<NextQuestion, RunTriageError> {
        let findings = session
            .visual_findings()
            .ok_or(DomainError::FindingsMissing)?
            .to_string();
        let history = session.history_text();
        let first_round = session.rounds_completed() == 0;

        let mut result = self
            .try_question(&agents.questions, &findings, &history, first_round, cancel)
            .await;
        if let Err(StepFailure::Failed(reason)) = &result {
            let reason = reason.clone();
            self.fall_back_question(session, agents, &reason, progress, cancel)
                .await?;
            result = self
                .try_question(&agents.questions, &findings, &history, first_round, cancel)
                .await;
        }

        result.map_err(|failure| match failure {
            StepFailure::Cancelled => abandoned(TriagePhase::Question),
            StepFailure::Failed(reason) => RunTriageError::QuestionUnavailable(reason),
        })
    }

    async fn try_question(
        &self,
        provider: &Arc<dyn QuestionProvider>,
        findings: &str,
        history: &str,
        first_round: bool,
        cancel: &CancellationToken,
    ) -> Result<NextQuestion, StepFailure> {
        let next = run_step(
            provider.ask(findings, history),
            self.params.provider_timeout,
            cancel,
        )
        .await?;

        match next {
            NextQuestion::Ask(question) if question.trim().is_empty() => Err(StepFailure::Failed(
                format!("{} returned an empty question", provider.name()),
            )),
            NextQuestion::Ask(question) => Ok(NextQuestion::Ask(question.trim().to_string())),
            NextQuestion::Stop if first_round => Err(StepFailure::Failed(format!(
                "{} stopped before asking any question",
                provider.name()
            ))),
            NextQuestion::Stop => Ok(NextQuestion::Stop),
        }
    }

    /// Switch the question role to its placeholder for the rest of the session.
    async fn fall_back_question(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        reason: &str,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(), RunTriageError> {
        let Some(fallback) = agents.question_fallback.take() else {
            return Err(RunTriageError::QuestionUnavailable(reason.to_string()));
        };
        warn!(
            provider = agents.questions.name(),
            fallback = fallback.name(),
            %reason,
            "Question provider failed, switching to placeholder"
        );
        self.degrade(session, TriagePhase::Question, reason, progress);

        match run_step(fallback.acquire(), self.params.provider_timeout, cancel).await {
            Ok(()) => {
                agents.held.push(Lease::Question(Arc::clone(&fallback)));
                agents.questions = fallback;
                Ok(())
            }
            Err(StepFailure::Cancelled) => Err(abandoned(TriagePhase::Question)),
            Err(StepFailure::Failed(reason)) => Err(RunTriageError::QuestionUnavailable(reason)),
        }
    }

    // ==================== Interaction ====================

    async fn collect_answer(
        &self,
        question: &str,
        round: usize,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Answer, RunTriageError> {
        progress.on_phase_start(TriagePhase::Interaction, round);
        let result = run_step(self.read_answer(question), self.params.answer_timeout, cancel).await;
        progress.on_phase_complete(TriagePhase::Interaction, result.is_ok());

        result.map_err(|failure| {
            let reason = match failure {
                StepFailure::Cancelled => "cancelled".to_string(),
                StepFailure::Failed(reason) => reason,
            };
            warn!(round, %reason, "No answer from the patient");
            RunTriageError::Abandoned {
                phase: TriagePhase::Interaction,
                reason,
            }
        })
    }

    /// Ask until a non-empty answer arrives.
    async fn read_answer(&self, question: &str) -> Result<Answer, InteractionError> {
        loop {
            let raw = self.interaction.ask(question).await?;
            if let Some(answer) = Answer::try_new(raw) {
                return Ok(answer);
            }
            debug!("Empty answer, asking again");
            self.interaction.on_empty_answer();
        }
    }

    // ==================== Diagnosis ====================

    async fn assess(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ReferralAssessment, RunTriageError> {
        let findings = session
            .visual_findings()
            .ok_or(DomainError::FindingsMissing)?
            .to_string();
        let history = session.history_text();

        let mut result = self
            .try_referral(&agents.referrals, &findings, &history, cancel)
            .await;
        if let Err(StepFailure::Failed(reason)) = &result {
            let reason = reason.clone();
            self.fall_back_referral(session, agents, &reason, progress, cancel)
                .await?;
            result = self
                .try_referral(&agents.referrals, &findings, &history, cancel)
                .await;
        }

        let assessment = result.map_err(|failure| match failure {
            StepFailure::Cancelled => abandoned(TriagePhase::Diagnosis),
            StepFailure::Failed(reason) => RunTriageError::ReferralUnavailable(reason),
        })?;
        debug!(
            complete = assessment.is_complete(),
            report = %preview(assessment.report(), 120),
            "Diagnostician assessment"
        );
        Ok(assessment)
    }

    async fn try_referral(
        &self,
        provider: &Arc<dyn ReferralProvider>,
        findings: &str,
        history: &str,
        cancel: &CancellationToken,
    ) -> Result<ReferralAssessment, StepFailure> {
        let assessment = run_step(
            provider.evaluate(findings, history),
            self.params.provider_timeout,
            cancel,
        )
        .await?;

        if assessment.is_complete() && assessment.report().trim().is_empty() {
            return Err(StepFailure::Failed(format!(
                "{} returned an empty report",
                provider.name()
            )));
        }
        Ok(assessment)
    }

    /// Switch the referral role to its placeholder for the rest of the session.
    async fn fall_back_referral(
        &self,
        session: &mut TriageSession,
        agents: &mut TextAgents,
        reason: &str,
        progress: &dyn TriageProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(), RunTriageError> {
        let Some(fallback) = agents.referral_fallback.take() else {
            return Err(RunTriageError::ReferralUnavailable(reason.to_string()));
        };
        warn!(
            provider = agents.referrals.name(),
            fallback = fallback.name(),
            %reason,
            "Referral provider failed, switching to placeholder"
        );
        self.degrade(session, TriagePhase::Diagnosis, reason, progress);

        match run_step(fallback.acquire(), self.params.provider_timeout, cancel).await {
            Ok(()) => {
                agents.held.push(Lease::Referral(Arc::clone(&fallback)));
                agents.referrals = fallback;
                Ok(())
            }
            Err(StepFailure::Cancelled) => Err(abandoned(TriagePhase::Diagnosis)),
            Err(StepFailure::Failed(reason)) => Err(RunTriageError::ReferralUnavailable(reason)),
        }
    }

    // ==================== Helpers ====================

    fn degrade(
        &self,
        session: &mut TriageSession,
        phase: TriagePhase,
        reason: &str,
        progress: &dyn TriageProgressNotifier,
    ) {
        session.mark_degraded();
        progress.on_fallback(phase, reason);
        self.record(
            "fallback",
            json!({ "phase": phase.as_str(), "reason": reason }),
        );
    }

    fn record(&self, event_type: &'static str, payload: Value) {
        self.transcript.log(TranscriptEvent::new(event_type, payload));
    }
}

fn abandoned(phase: TriagePhase) -> RunTriageError {
    RunTriageError::Abandoned {
        phase,
        reason: "cancelled".to_string(),
    }
}

/// Text providers in use for one session, plus the leases to give back.
struct TextAgents {
    questions: Arc<dyn QuestionProvider>,
    referrals: Arc<dyn ReferralProvider>,
    question_fallback: Option<Arc<dyn QuestionProvider>>,
    referral_fallback: Option<Arc<dyn ReferralProvider>>,
    held: Vec<Lease>,
}

enum Lease {
    Question(Arc<dyn QuestionProvider>),
    Referral(Arc<dyn ReferralProvider>),
}

impl TextAgents {
    async fn release_all(&mut self) {
        for lease in std::mem::take(&mut self.held) {
            match lease {
                Lease::Question(provider) => provider.release().await,
                Lease::Referral(provider) => provider.release().await,
            }
        }
    }
}

/// Why a bounded step did not produce a value
enum StepFailure {
    Failed(String),
    Cancelled,
}

/// Await `fut` under an optional time limit, giving up when `cancel` fires.
async fn run_step<T, E, F>(
    fut: F,
    limit: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<T, StepFailure>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    let bounded = async move {
        match limit {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map_err(|e| StepFailure::Failed(e.to_string())),
                Err(_) => Err(StepFailure::Failed(format!(
                    "no response within {}s",
                    limit.as_secs_f32()
                ))),
            },
            None => fut.await.map_err(|e| StepFailure::Failed(e.to_string())),
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StepFailure::Cancelled),
        result = bounded => result,
    }
}
