//! Referral assessment - the diagnostician's structured result.
//!
//! The orchestrator branches on [`ReferralAssessment::is_complete`] only.
//! Adapters that receive free text from a language model derive the flag
//! with [`ReferralAssessment::from_model_output`], which is the single place
//! where the textual sentinel is interpreted.

use serde::{Deserialize, Serialize};

/// Case-insensitive marker meaning "not enough information yet"
pub const INSUFFICIENT_INFO_SENTINEL: &str = "insufficient info";

/// Literal marker the diagnostician prompt asks the model to emit
const INSUFFICIENT_INFO_MARKER: &str = "insufficient_info";

/// Check free text for the insufficient-information sentinel.
///
/// Matches `insufficient info` in any case, and the `INSUFFICIENT_INFO`
/// marker. Substring match: a report that mentions the phrase incidentally
/// will also match.
pub fn contains_insufficient_sentinel(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(INSUFFICIENT_INFO_SENTINEL) || lower.contains(INSUFFICIENT_INFO_MARKER)
}

/// Result of one diagnostician pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralAssessment {
    complete: bool,
    report: String,
}

impl ReferralAssessment {
    /// A final referral report
    pub fn complete(report: impl Into<String>) -> Self {
        Self {
            complete: true,
            report: report.into(),
        }
    }

    /// More interview rounds are needed; `report` carries the model's notes
    pub fn insufficient(report: impl Into<String>) -> Self {
        Self {
            complete: false,
            report: report.into(),
        }
    }

    /// Interpret free-form model output.
    pub fn from_model_output(text: impl Into<String>) -> Self {
        let text = text.into();
        if contains_insufficient_sentinel(&text) {
            Self::insufficient(text)
        } else {
            Self::complete(text)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn into_report(self) -> String {
        self.report
    }
}
