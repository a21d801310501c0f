//! Progress reporting for triage sessions

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use visionlink_application::TriageProgressNotifier;
use visionlink_domain::core::string::preview;
use visionlink_domain::{ReferralAssessment, TriagePhase};

fn phase_label(phase: TriagePhase, round: usize) -> String {
    match phase {
        TriagePhase::Findings => phase.display_name().to_string(),
        _ => format!("Round {}: {}", round, phase.display_name()),
    }
}

/// Reports progress with a spinner per model phase
///
/// No spinner runs during the interaction phase, so it never draws over the
/// patient prompt.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: TriagePhase, round: usize) {
        if phase == TriagePhase::Interaction {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(phase_label(phase, round));
        pb.set_message("working...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_phase_complete(&self, phase: TriagePhase, success: bool) {
        if phase == TriagePhase::Interaction {
            return;
        }
        if let Some(pb) = self.take_spinner() {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.finish_with_message(format!("{}", "failed".red()));
            }
        }
    }

    fn on_findings(&self, findings: &str) {
        println!("  {} {}", "Findings:".dimmed(), preview(findings, 100));
    }

    fn on_assessment(&self, round: usize, assessment: &ReferralAssessment) {
        if !assessment.is_complete() {
            println!(
                "  {} round {} needs more information",
                "->".yellow(),
                round
            );
        }
    }

    fn on_fallback(&self, phase: TriagePhase, reason: &str) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        println!(
            "  {} {} model failed ({}); using placeholder output",
            "!".yellow().bold(),
            phase.display_name(),
            preview(reason, 80)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_label() {
        assert_eq!(phase_label(TriagePhase::Findings, 0), TriagePhase::Findings.display_name());
        assert!(phase_label(TriagePhase::Diagnosis, 2).starts_with("Round 2: "));
    }

    #[test]
    fn test_spinner_replaced_and_cleared() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_start(TriagePhase::Question, 1);
        reporter.on_phase_start(TriagePhase::Diagnosis, 1);
        reporter.on_phase_complete(TriagePhase::Diagnosis, true);
        assert!(reporter.take_spinner().is_none());
    }

    #[test]
    fn test_interaction_phase_has_no_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_start(TriagePhase::Interaction, 1);
        assert!(reporter.take_spinner().is_none());
    }
}
