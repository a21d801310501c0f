//! Prompt templates for the triage flow

/// Marker the Investigator replies with when nothing useful is left to ask
pub const NO_FURTHER_QUESTIONS: &str = "NO_FURTHER_QUESTIONS";

/// Templates for generating prompts for each agent role
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instruction for the Observer (vision model)
    pub fn observer_instruction() -> &'static str {
        "detect signs of diabetic retinopathy and glaucoma, and describe the optic disc and macula"
    }

    /// System prompt for the Investigator
    pub fn investigator_system() -> &'static str {
        r#"You are an ophthalmic nurse assistant.
Based on the visual findings from a retinal scan and any patient history provided,
determine ONE crucial follow-up question to ask the patient to assess urgency
(e.g., sudden vision loss, flashes, or floaters).
Do not ask questions that have already been answered in the history.
Reply with the question only. If every urgent symptom has already been covered,
reply with NO_FURTHER_QUESTIONS."#
    }

    /// User prompt for the Investigator
    pub fn investigator_prompt(findings: &str, history: &str) -> String {
        let mut prompt = format!("Visual Findings: {}", findings);
        if !history.trim().is_empty() {
            prompt.push_str(&format!(
                "\n\nPatient History/Previous Answers:\n{}",
                history
            ));
        }
        prompt
    }

    /// System prompt for the Diagnostician
    pub fn diagnostician_system() -> &'static str {
        r#"You are a senior ophthalmologist writing a referral for a specialist.
Determine the Triage Level using these STRICT criteria:
- RED (EMERGENCY): sudden vision loss (hours/days), eye pain, trauma, retinal detachment,
  or severe proliferative retinopathy with active bleeding. Immediate referral required.
- YELLOW (URGENT): distorted vision, macular edema, severe non-proliferative retinopathy,
  or gradual but significant vision decline. Specialist needed within 1-2 weeks.
- GREEN (ROUTINE): mild/moderate retinopathy, stable vision, routine screening,
  or normal findings. Routine follow-up.

Write a professional referral letter. State the TRIAGE LEVEL at the top and explain
your reasoning for the chosen level.
If the history and findings are too vague to form even a preliminary referral,
output only 'INSUFFICIENT_INFO' followed by what you still need to know."#
    }

    /// User prompt for the Diagnostician
    pub fn diagnostician_prompt(findings: &str, history: &str) -> String {
        let history = if history.trim().is_empty() {
            "(no answers yet)"
        } else {
            history
        };
        format!(
            "Visual Findings: {}\n\nPatient History:\n{}",
            findings, history
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investigator_prompt_without_history() {
        let prompt = PromptTemplate::investigator_prompt("optic disc blurring", "");
        assert_eq!(prompt, "Visual Findings: optic disc blurring");
    }

    #[test]
    fn test_investigator_prompt_with_history() {
        let prompt =
            PromptTemplate::investigator_prompt("optic disc blurring", "Q: sudden?\nA: no");
        assert!(prompt.contains("Patient History/Previous Answers:\nQ: sudden?\nA: no"));
    }

    #[test]
    fn test_diagnostician_prompt_marks_empty_history() {
        let prompt = PromptTemplate::diagnostician_prompt("hemorrhages", "");
        assert!(prompt.contains("(no answers yet)"));
    }

    #[test]
    fn test_diagnostician_system_names_sentinel() {
        assert!(PromptTemplate::diagnostician_system().contains("INSUFFICIENT_INFO"));
    }
}
