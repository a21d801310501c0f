//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use visionlink_domain::OutputFormat as DomainOutputFormat;

/// Output format for triage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Findings, interview transcript, report and triage level
    Full,
    /// Only the final referral report
    Report,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Report => DomainOutputFormat::Report,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for visionlink
#[derive(Parser, Debug)]
#[command(name = "visionlink")]
#[command(author, version, about = "Retinal scan triage - interview the patient, write the referral")]
#[command(long_about = r#"
VisionLink triages a retinal scan with three cooperating models.

The session has three steps:
1. Findings: a vision model describes the scan (once)
2. Interview: a text model asks the patient one question per round
3. Diagnosis: a text model writes the referral, or asks for another round

The interview ends when the referral is ready or the round cap is reached.

Configuration files are loaded from (in priority order):
1. VISIONLINK_* environment variables (e.g. VISIONLINK_TRIAGE__MAX_ROUNDS=3)
2. --config <path>     Explicit config file
3. ./visionlink.toml   Project-level config
4. ~/.config/visionlink/config.toml   Global config

Example:
  visionlink scans/0_left.jpg
  visionlink --example G --output report
  visionlink --mock --example D --transcript session.jsonl
"#)]
pub struct Cli {
    /// Retinal scan to triage
    pub image: Option<PathBuf>,

    /// Start from the first catalog scan with this label (N, D, G, C, A, H, M, O)
    #[arg(short, long, value_name = "LABEL", conflicts_with = "image")]
    pub example: Option<String>,

    /// Example catalog JSON file
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Run without an inference server: catalog findings and placeholder agents
    #[arg(long)]
    pub mock: bool,

    /// Maximum interview rounds
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_rounds: Option<u32>,

    /// Seconds to wait for each patient answer
    #[arg(long, value_name = "SECS")]
    pub answer_timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write a JSONL transcript of the session to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_image_and_flags() {
        let cli = Cli::try_parse_from([
            "visionlink",
            "scan1.jpg",
            "--max-rounds",
            "3",
            "--answer-timeout",
            "120",
            "-o",
            "report",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.image, Some(PathBuf::from("scan1.jpg")));
        assert_eq!(cli.max_rounds, Some(3));
        assert_eq!(cli.answer_timeout, Some(120));
        assert_eq!(cli.output, Some(OutputFormat::Report));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.mock);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(Cli::try_parse_from(["visionlink", "--max-rounds", "0"]).is_err());
    }

    #[test]
    fn test_image_conflicts_with_example() {
        assert!(Cli::try_parse_from(["visionlink", "scan1.jpg", "--example", "D"]).is_err());
    }

    #[test]
    fn test_output_format_into_domain() {
        assert_eq!(
            DomainOutputFormat::from(OutputFormat::Json),
            DomainOutputFormat::Json
        );
    }
}
