//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for triage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Findings, interview transcript, report and level (default)
    #[default]
    Full,
    /// Only the final referral report
    Report,
    /// JSON output
    Json,
}
