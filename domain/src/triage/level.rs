//! Triage level and report parsing.
//!
//! The diagnostician writes free text; the level is recovered heuristically.
//! Pure text matching, no I/O.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity classification embedded in a referral report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageLevel {
    /// Sudden vision loss, pain, trauma, detachment, active bleeding
    Red,
    /// Distorted vision, macular edema, significant gradual decline
    Yellow,
    /// Stable vision, mild findings, routine screening
    Green,
}

impl TriageLevel {
    pub fn as_str(&self) -> &str {
        match self {
            TriageLevel::Red => "red",
            TriageLevel::Yellow => "yellow",
            TriageLevel::Green => "green",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TriageLevel::Red => "Red (Emergency)",
            TriageLevel::Yellow => "Yellow (Urgent)",
            TriageLevel::Green => "Green (Routine)",
        }
    }

    /// Expected time to specialist review
    pub fn follow_up(&self) -> &str {
        match self {
            TriageLevel::Red => "Immediate referral",
            TriageLevel::Yellow => "Specialist within 1-2 weeks",
            TriageLevel::Green => "Routine follow-up",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "RED" | "EMERGENCY" => Some(TriageLevel::Red),
            "YELLOW" | "URGENT" => Some(TriageLevel::Yellow),
            "GREEN" | "ROUTINE" => Some(TriageLevel::Green),
            _ => None,
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TriageLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(&s.trim().to_uppercase())
            .ok_or_else(|| format!("unknown triage level: {}", s))
    }
}

/// How many words after a `TRIAGE` label are searched for the level
const LABEL_WINDOW: usize = 4;

/// Extract the triage level from a referral report.
///
/// 1. A `TRIAGE:` / `TRIAGE LEVEL:` label followed by a level keyword wins.
/// 2. Otherwise the first level keyword anywhere in the text.
///
/// Matches whole words only, so "referred" never reads as "red". A keyword
/// directly after `NON` / `NOT` / `NO` does not count, except that
/// "non-urgent" and "not urgent" read as Green.
///
/// # Examples
///
/// ```
/// use visionlink_domain::{TriageLevel, parse_triage_level};
///
/// assert_eq!(
///     parse_triage_level("REFERRAL: Routine. TRIAGE: Green."),
///     Some(TriageLevel::Green)
/// );
/// assert_eq!(
///     parse_triage_level("TRIAGE: Non-urgent (Green)."),
///     Some(TriageLevel::Green)
/// );
/// assert_eq!(parse_triage_level("Patient referred."), None);
/// ```
pub fn parse_triage_level(report: &str) -> Option<TriageLevel> {
    let upper = report.to_uppercase();
    let words: Vec<&str> = upper
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    for (i, word) in words.iter().enumerate() {
        if *word != "TRIAGE" {
            continue;
        }
        if let Some(level) = (i + 1..words.len())
            .take(LABEL_WINDOW)
            .find_map(|j| keyword_at(&words, j))
        {
            return Some(level);
        }
    }

    (0..words.len()).find_map(|j| keyword_at(&words, j))
}

/// Level named by `words[i]`, taking a preceding negation into account.
fn keyword_at(words: &[&str], i: usize) -> Option<TriageLevel> {
    let word = words[i];
    let level = TriageLevel::from_keyword(word)?;
    let negated = i > 0 && matches!(words[i - 1], "NON" | "NOT" | "NO");
    if !negated {
        return Some(level);
    }
    (word == "URGENT").then_some(TriageLevel::Green)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wins_over_earlier_keyword() {
        assert_eq!(
            parse_triage_level("REFERRAL: Routine. TRIAGE: Green."),
            Some(TriageLevel::Green)
        );
        assert_eq!(
            parse_triage_level("Not routine at all.\nTRIAGE LEVEL: RED (EMERGENCY)"),
            Some(TriageLevel::Red)
        );
    }

    #[test]
    fn test_mixed_case_label() {
        assert_eq!(
            parse_triage_level("Triage level - Yellow (Urgent). Macular edema noted."),
            Some(TriageLevel::Yellow)
        );
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(
            parse_triage_level("This is an emergency: suspected retinal detachment."),
            Some(TriageLevel::Red)
        );
    }

    #[test]
    fn test_non_urgent_reads_as_green() {
        assert_eq!(
            parse_triage_level("TRIAGE: Non-urgent (Green). Routine follow-up."),
            Some(TriageLevel::Green)
        );
        assert_eq!(
            parse_triage_level("TRIAGE: not urgent, recheck in a year."),
            Some(TriageLevel::Green)
        );
    }

    #[test]
    fn test_negated_keyword_is_skipped() {
        assert_eq!(
            parse_triage_level("No emergency signs. TRIAGE: Non-emergency, Yellow."),
            Some(TriageLevel::Yellow)
        );
        assert_eq!(parse_triage_level("Not red, not green."), None);
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(parse_triage_level("Patient referred; greenish tint."), None);
    }

    #[test]
    fn test_no_level() {
        assert_eq!(parse_triage_level(""), None);
        assert_eq!(parse_triage_level("insufficient info"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Yellow".parse::<TriageLevel>(), Ok(TriageLevel::Yellow));
        assert_eq!(" emergency ".parse::<TriageLevel>(), Ok(TriageLevel::Red));
        assert!("purple".parse::<TriageLevel>().is_err());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&TriageLevel::Red).unwrap();
        assert_eq!(json, "\"red\"");
    }
}
