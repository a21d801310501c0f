//! Console output formatter for triage outcomes

use colored::{ColoredString, Colorize};
use visionlink_application::RunTriageError;
use visionlink_domain::{OutputFormat, TriageLevel, TriageOutcome, TriageVerdict};

/// Formats triage outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render in the requested format
    pub fn render(outcome: &TriageOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(outcome),
            OutputFormat::Report => Self::format_report_only(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete session: findings, interview, report and level
    pub fn format(outcome: &TriageOutcome) -> String {
        let session = &outcome.session;
        let mut output = String::new();

        output.push_str(&Self::header("VisionLink Triage"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), session.id()));
        output.push_str(&format!("{} {}\n", "Scan:".cyan().bold(), session.image()));
        if session.is_degraded() {
            output.push_str(&format!(
                "{}\n",
                "Degraded: placeholder output was used in this session".yellow().bold()
            ));
        }

        output.push_str(&Self::section_header("Visual Findings"));
        output.push_str(&format!(
            "\n{}\n",
            session.visual_findings().unwrap_or("(none)")
        ));

        output.push_str(&Self::section_header("Interview"));
        if session.history().is_empty() {
            output.push_str("\n(no questions asked)\n");
        }
        for (i, entry) in session.history().iter().enumerate() {
            output.push_str(&format!(
                "\n{} {}\n{} {}\n",
                format!("Q{}:", i + 1).yellow().bold(),
                entry.question,
                format!("A{}:", i + 1).green().bold(),
                entry.answer
            ));
        }

        match &outcome.verdict {
            TriageVerdict::Concluded { report, level } => {
                output.push_str(&Self::section_header("Referral"));
                output.push_str(&format!("\n{}\n", report));
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Triage level:".cyan().bold(),
                    Self::level_label(*level)
                ));
                if let Some(level) = level {
                    output.push_str(&format!("{} {}\n", "Follow-up:".cyan().bold(), level.follow_up()));
                }
            }
            TriageVerdict::Inconclusive { last_report, .. } => {
                output.push_str(&Self::section_header("Referral"));
                output.push_str(&format!("\n{}\n", outcome.summary().red().bold()));
                if let Some(notes) = last_report {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        "Last diagnostician notes:".dimmed(),
                        Self::indent(notes, "  ")
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Only the referral text, or the inconclusive message
    pub fn format_report_only(outcome: &TriageOutcome) -> String {
        match outcome.report() {
            Some(report) => format!("{}\n", report),
            None => format!("{}\n", outcome.summary()),
        }
    }

    /// Format as JSON
    pub fn format_json(outcome: &TriageOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// User-facing failure line: the phase and a short message
    pub fn format_error(error: &RunTriageError) -> String {
        match error.phase() {
            Some(phase) => format!(
                "{} {} failed: {}",
                "Error:".red().bold(),
                phase.user_facing(),
                error
            ),
            None => format!("{} {}", "Error:".red().bold(), error),
        }
    }

    fn level_label(level: Option<TriageLevel>) -> ColoredString {
        match level {
            Some(TriageLevel::Red) => TriageLevel::Red.display_name().red().bold(),
            Some(TriageLevel::Yellow) => TriageLevel::Yellow.display_name().yellow().bold(),
            Some(TriageLevel::Green) => TriageLevel::Green.display_name().green().bold(),
            None => "not stated".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionlink_domain::{Answer, ReferralAssessment, TriagePhase, TriageSession};

    fn concluded() -> TriageOutcome {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        session.record_findings("mild disc blurring").unwrap();
        session.ask("sudden or gradual?").unwrap();
        session
            .record_answer(&Answer::try_new("gradual").unwrap())
            .unwrap();
        let report = "REFERRAL: Routine. TRIAGE: Green.";
        session
            .record_referral(&ReferralAssessment::complete(report))
            .unwrap();
        TriageOutcome::concluded(session, report)
    }

    fn inconclusive() -> TriageOutcome {
        let mut session = TriageSession::new("scan1.jpg").unwrap();
        session.record_findings("mild disc blurring").unwrap();
        session.ask("sudden or gradual?").unwrap();
        session
            .record_answer(&Answer::try_new("not sure").unwrap())
            .unwrap();
        session
            .record_referral(&ReferralAssessment::insufficient("insufficient info"))
            .unwrap();
        session.terminate_inconclusive().unwrap();
        TriageOutcome::inconclusive(session)
    }

    #[test]
    fn test_full_output_contains_every_section() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&concluded());
        assert!(output.contains("mild disc blurring"));
        assert!(output.contains("Q1: sudden or gradual?"));
        assert!(output.contains("A1: gradual"));
        assert!(output.contains("REFERRAL: Routine. TRIAGE: Green."));
        assert!(output.contains("Green (Routine)"));
    }

    #[test]
    fn test_report_only() {
        assert_eq!(
            ConsoleFormatter::format_report_only(&concluded()),
            "REFERRAL: Routine. TRIAGE: Green.\n"
        );
        assert!(
            ConsoleFormatter::format_report_only(&inconclusive())
                .contains("Unable to reach a conclusive triage decision after 1 rounds")
        );
    }

    #[test]
    fn test_json_output_is_parseable() {
        let json = ConsoleFormatter::render(&concluded(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["verdict"]["verdict"], "concluded");
        assert_eq!(value["verdict"]["level"], "green");
    }

    #[test]
    fn test_inconclusive_full_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&inconclusive());
        assert!(output.contains("Unable to reach a conclusive triage decision"));
        assert!(output.contains("  insufficient info"));
    }

    #[test]
    fn test_error_names_phase() {
        colored::control::set_override(false);
        let err = RunTriageError::Abandoned {
            phase: TriagePhase::Interaction,
            reason: "cancelled".to_string(),
        };
        let line = ConsoleFormatter::format_error(&err);
        assert!(line.starts_with("Error: interview failed:"));
    }
}
