//! ParlaMint CLI - Future Tense Usage Statistics
//!
//! Scrapes verb forms, counts them in the ParlaMint-RO corpus and ranks
//! the results.

use clap::Parser;
use parlamint::analysis::AnalysisEngine;
use parlamint::config::{AnalysisConfig, CliArgs, Commands, ReportConfig, ScrapeConfig};
use parlamint::error::{ParlaMintError, Result};
use parlamint::progress::ProgressReporter;
use parlamint::report::Report;
use parlamint::scrape::Scraper;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn progress(args: &CliArgs, unit: &str) -> ProgressReporter {
    if args.quiet {
        ProgressReporter::disabled()
    } else {
        ProgressReporter::new(unit)
    }
}

fn run(args: &CliArgs) -> Result<()> {
    match &args.command {
        Commands::Scrape { .. } => cmd_scrape(args),
        Commands::PerSession { .. } => cmd_count(args, false),
        Commands::PerForm { .. } => cmd_count(args, true),
        Commands::TopForms { .. } => cmd_report(args, false),
        Commands::TopSpeakers { .. } => cmd_report(args, true),
    }
}

fn cmd_scrape(args: &CliArgs) -> Result<()> {
    let config = ScrapeConfig::from_cli(args).map_err(ParlaMintError::ConfigError)?;
    let scraper = Scraper::new(config)?.with_progress(progress(args, "verbs"));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| ParlaMintError::ThreadPoolError(e.to_string()))?;
    let summary = runtime.block_on(scraper.run())?;

    if !args.quiet {
        summary.print_summary();
    }
    Ok(())
}

fn cmd_count(args: &CliArgs, per_form: bool) -> Result<()> {
    let config = AnalysisConfig::from_cli(args).map_err(ParlaMintError::ConfigError)?;
    tracing::debug!("Running with {} worker threads", config.threads);

    let engine = AnalysisEngine::new(config).with_progress(progress(args, "sessions"));
    let summary = if per_form {
        engine.per_form()?
    } else {
        engine.per_session()?
    };

    if !args.quiet {
        summary.print_summary();
    }
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_report(args: &CliArgs, speakers: bool) -> Result<()> {
    let config = ReportConfig::from_cli(args).map_err(ParlaMintError::ConfigError)?;
    let report = if speakers {
        Report::top_speakers(&config)?
    } else {
        Report::top_forms(&config)?
    };
    report.emit(&config)
}
