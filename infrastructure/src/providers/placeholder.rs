//! Placeholder text providers (degraded mode)
//!
//! Used when the text model cannot be loaded or fails mid-session, and as the
//! primary text providers in `--mock` runs. Every output carries the
//! [`PLACEHOLDER_LABEL`] prefix so it can never pass for model output.

use async_trait::async_trait;
use visionlink_application::{NextQuestion, ProviderError, QuestionProvider, ReferralProvider};
use visionlink_domain::ReferralAssessment;

pub const PLACEHOLDER_LABEL: &str = "[PLACEHOLDER]";

/// Fixed screening questions, asked in order
const SCREENING_QUESTIONS: [&str; 3] = [
    "Is the vision loss sudden or gradual?",
    "How long have you noticed the change in your vision?",
    "Do you have eye pain, flashes of light, or new floaters?",
];

/// Count the rounds already in a rendered history.
fn answered_rounds(history: &str) -> usize {
    history.lines().filter(|line| line.starts_with("Q: ")).count()
}

/// Asks the fixed screening questions, then stops.
#[derive(Debug, Default)]
pub struct PlaceholderInvestigator;

#[async_trait]
impl QuestionProvider for PlaceholderInvestigator {
    fn name(&self) -> &str {
        "placeholder investigator"
    }

    async fn ask(&self, _findings: &str, history: &str) -> Result<NextQuestion, ProviderError> {
        Ok(SCREENING_QUESTIONS
            .get(answered_rounds(history))
            .map_or(NextQuestion::Stop, |question| {
                NextQuestion::Ask(format!("{} {}", PLACEHOLDER_LABEL, question))
            }))
    }
}

/// Insufficient until one answer exists, then a labeled referral that asks for
/// manual review.
#[derive(Debug, Default)]
pub struct PlaceholderDiagnostician;

#[async_trait]
impl ReferralProvider for PlaceholderDiagnostician {
    fn name(&self) -> &str {
        "placeholder diagnostician"
    }

    async fn evaluate(
        &self,
        findings: &str,
        history: &str,
    ) -> Result<ReferralAssessment, ProviderError> {
        if history.trim().is_empty() {
            return Ok(ReferralAssessment::insufficient(format!(
                "{} INSUFFICIENT_INFO. Ask about symptom onset and duration.",
                PLACEHOLDER_LABEL
            )));
        }

        Ok(ReferralAssessment::complete(format!(
            "{label} TRIAGE: Yellow (Urgent).\n\
             {label} Automated referral unavailable; a clinician must review this case.\n\
             Visual findings: {findings}\n\
             Patient history:\n{history}",
            label = PLACEHOLDER_LABEL,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionlink_domain::{TriageLevel, parse_triage_level};

    #[tokio::test]
    async fn test_investigator_walks_the_script_then_stops() {
        let investigator = PlaceholderInvestigator;

        let first = investigator.ask("drusen", "").await.unwrap();
        assert_eq!(
            first,
            NextQuestion::Ask("[PLACEHOLDER] Is the vision loss sudden or gradual?".to_string())
        );

        let history = "Q: a?\nA: x\nQ: b?\nA: y";
        let third = investigator.ask("drusen", history).await.unwrap();
        assert!(matches!(third, NextQuestion::Ask(q) if q.contains("flashes")));

        let history = "Q: a?\nA: x\nQ: b?\nA: y\nQ: c?\nA: z";
        assert_eq!(
            investigator.ask("drusen", history).await.unwrap(),
            NextQuestion::Stop
        );
    }

    #[tokio::test]
    async fn test_diagnostician_needs_one_answer() {
        let diagnostician = PlaceholderDiagnostician;

        let first = diagnostician.evaluate("drusen", "").await.unwrap();
        assert!(!first.is_complete());
        assert!(first.report().starts_with(PLACEHOLDER_LABEL));

        let second = diagnostician
            .evaluate("drusen", "Q: sudden?\nA: gradual")
            .await
            .unwrap();
        assert!(second.is_complete());
        assert!(second.report().starts_with(PLACEHOLDER_LABEL));
        assert!(second.report().contains("A: gradual"));
        assert_eq!(parse_triage_level(second.report()), Some(TriageLevel::Yellow));
    }
}
