//! CLI entrypoint for VisionLink
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use visionlink_application::{
    FindingsProvider, NoProgress, NoTranscriptLogger, QuestionProvider, ReferralProvider,
    RunTriageInput, RunTriageUseCase, TranscriptLogger, TriageProgressNotifier,
};
use visionlink_domain::{OutputFormat, SessionId};
use visionlink_infrastructure::{
    CatalogFindingsProvider, ConfigLoader, ExampleCatalog, FileConfig, JsonlTranscriptLogger,
    ModelResidency, OllamaClient, OllamaDiagnostician, OllamaInvestigator, OllamaObserver,
    PlaceholderDiagnostician, PlaceholderInvestigator,
};
use visionlink_presentation::{
    Cli, ConsoleFormatter, ConsoleInteraction, OutputConfig, ProgressReporter,
};

/// Exit code when the round cap ends the session without a referral
const EXIT_INCONCLUSIVE: u8 = 2;

/// Exit code for a second Ctrl-C while the session is shutting down
const EXIT_INTERRUPTED: i32 = 130;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    run_detached(runtime, run(cli))
}

/// Drive `future` to completion, then shut the runtime down without waiting
/// for blocking tasks.
///
/// An abandoned session can leave a console read parked on stdin; dropping
/// the runtime normally would keep the process alive until the next line.
fn run_detached<T>(runtime: Runtime, future: impl Future<Output = T>) -> T {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Held until exit so the file writer drains
    let _log_guard = init_logging(cli.verbose, config.logging.resolved_dir().as_deref());

    info!("Starting VisionLink");
    check_config(&config)?;

    // === CLI overrides ===
    let mut params = config.triage.to_params();
    if let Some(rounds) = cli.max_rounds {
        params = params.with_max_rounds(rounds as usize);
    }
    if let Some(secs) = cli.answer_timeout {
        params = params.with_answer_timeout(Some(Duration::from_secs(secs)));
    }

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let output = OutputConfig::default()
        .with_format(format)
        .with_color(config.output.color)
        .with_progress(!cli.quiet && format != OutputFormat::Json);
    output.apply_color();

    // === Session bootstrap ===
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());
    let catalog = if cli.mock || cli.image.is_none() {
        let catalog = ExampleCatalog::load(&catalog_path)
            .with_context(|| format!("Cannot open example catalog {}", catalog_path.display()))?;
        Some(Arc::new(catalog))
    } else {
        None
    };

    let image = match (&cli.image, &catalog) {
        (Some(image), _) => image.display().to_string(),
        (None, Some(catalog)) => {
            let label = cli
                .example
                .clone()
                .unwrap_or_else(|| config.catalog.default_label.clone());
            let entry = catalog.first(&label)?;
            info!(label = %entry.label, image = %entry.image_path, "Using catalog example");
            entry.image_path.clone()
        }
        (None, None) => bail!("An image path or --example label is required."),
    };

    // === Dependency Injection ===
    let mut use_case = match &catalog {
        Some(catalog) if cli.mock => {
            info!("Mock mode: catalog findings with placeholder agents");
            RunTriageUseCase::new(
                Arc::new(CatalogFindingsProvider::new(Arc::clone(catalog))),
                Arc::new(PlaceholderInvestigator),
                Arc::new(PlaceholderDiagnostician),
                Arc::new(ConsoleInteraction::new()),
            )
        }
        _ => ollama_use_case(&config).await?,
    }
    .with_params(params);

    let session_id = SessionId::generate();
    if let Some(logger) = transcript_logger(&cli.transcript, &config, &session_id) {
        use_case = use_case.with_transcript_logger(logger);
    }

    if output.show_progress {
        println!();
        println!("+============================================================+");
        println!("|              VisionLink - Retinal Triage                   |");
        println!("+============================================================+");
        println!();
        println!("Scan: {}", image);
        println!("Session: {}", session_id);
        println!();
    }

    // === Run ===
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, abandoning session");
        on_ctrl_c.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(EXIT_INTERRUPTED);
        }
    });

    let progress: Box<dyn TriageProgressNotifier> = if output.show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    let input = RunTriageInput::new(image).with_session_id(session_id);
    match use_case
        .execute_with_progress(input, progress.as_ref(), &cancel)
        .await
    {
        Ok(outcome) => {
            println!("{}", ConsoleFormatter::render(&outcome, output.format));
            if outcome.is_conclusive() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_INCONCLUSIVE))
            }
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Console logging by verbosity, plus a daily file when a log directory is set.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "visionlink.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Log warnings; refuse to start on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    let mut errors = 0;
    for issue in &issues {
        if issue.is_error() {
            eprintln!("config error: {}", issue.message);
            errors += 1;
        } else {
            warn!("{}", issue.message);
        }
    }
    if errors > 0 {
        bail!("{} configuration error(s)", errors);
    }
    Ok(())
}

/// Wire the three roles to the Ollama server, with placeholder fallbacks if enabled.
async fn ollama_use_case(config: &FileConfig) -> Result<RunTriageUseCase> {
    let client = Arc::new(
        OllamaClient::new(&config.providers.ollama).context("Failed to create Ollama client")?,
    );
    if !client.is_available().await {
        warn!(
            url = client.base_url(),
            "Ollama server is not reachable; model calls will fail"
        );
    }
    let residency = Arc::new(ModelResidency::new(client.clone()));
    let models = &config.models;

    let findings: Arc<dyn FindingsProvider> = Arc::new(OllamaObserver::new(
        client.clone(),
        residency.clone(),
        models.observer.clone(),
    ));
    let questions: Arc<dyn QuestionProvider> = Arc::new(OllamaInvestigator::new(
        client.clone(),
        residency.clone(),
        models.investigator.clone(),
    ));
    let referrals: Arc<dyn ReferralProvider> = Arc::new(OllamaDiagnostician::new(
        client,
        residency,
        models.diagnostician.clone(),
    ));

    let use_case = RunTriageUseCase::new(
        findings,
        questions,
        referrals,
        Arc::new(ConsoleInteraction::new()),
    );

    Ok(if config.triage.fallback_to_placeholder {
        use_case
            .with_question_fallback(Arc::new(PlaceholderInvestigator))
            .with_referral_fallback(Arc::new(PlaceholderDiagnostician))
    } else {
        use_case
    })
}

/// `--transcript <file>` wins over `[logging] transcript = true`.
fn transcript_logger(
    explicit: &Option<PathBuf>,
    config: &FileConfig,
    session: &SessionId,
) -> Option<Arc<dyn TranscriptLogger>> {
    let logger = match explicit {
        Some(path) => JsonlTranscriptLogger::new(path),
        None if config.logging.transcript => {
            let dir = config
                .logging
                .resolved_dir()
                .unwrap_or_else(|| PathBuf::from("."));
            JsonlTranscriptLogger::in_directory(dir, session)
        }
        None => return None,
    };

    match logger {
        Some(logger) => {
            info!(path = %logger.path().display(), "Writing session transcript");
            Some(Arc::new(logger))
        }
        None => {
            warn!("Transcript disabled: file could not be created");
            Some(Arc::new(NoTranscriptLogger))
        }
    }
}
