//! Landing-Monitor main entry point
//!
//! This is the command-line interface for the Landing-Monitor link health checker.

use anyhow::Context;
use clap::Parser;
use landing_monitor::checker::{Monitor, MonitorReport};
use landing_monitor::config::{load_config_with_hash, Config};
use landing_monitor::output::write_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Landing-Monitor: checks landing pages for bad responses and error content
///
/// Landing-Monitor fetches the final URLs of every configured target,
/// flags HTTP errors, redirects and error phrases in page bodies, and
/// sends a summary when something needs attention.
#[derive(Parser, Debug)]
#[command(name = "landing-monitor")]
#[command(version)]
#[command(about = "Checks landing pages for bad responses and error content", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be checked without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Never send a notification, even when one is due
    #[arg(long)]
    no_notify: bool,

    /// Print per-target results as JSON
    #[arg(long, conflicts_with = "dry_run")]
    json: bool,

    /// Write the rendered report to this path (overrides output.report-path)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let monitor = Monitor::with_config_hash(config, Some(&config_hash))?;

    if cli.dry_run {
        handle_dry_run(&monitor);
        return Ok(());
    }

    let report = monitor
        .run(chrono::Local::now().date_naive(), !cli.no_notify)
        .await?;

    let report_path = cli.report.clone().or_else(|| {
        monitor
            .config()
            .output
            .report_path
            .as_ref()
            .map(PathBuf::from)
    });
    if let Some(path) = report_path {
        write_report(&report.document, &path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("landing_monitor=info,warn"),
            1 => EnvFilter::new("landing_monitor=debug,info"),
            2 => EnvFilter::new("landing_monitor=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows rules and the URLs each target would check
fn handle_dry_run(monitor: &Monitor) {
    let config: &Config = monitor.config();

    println!("=== Landing-Monitor Dry Run ===\n");

    println!("Rules:");
    println!("  Error code patterns: {:?}", config.rules.error_code_patterns);
    println!("  Warning code patterns: {:?}", config.rules.warning_code_patterns);
    println!("  Content error phrases: {:?}", config.rules.content_error_phrases);
    println!("  Strip query parameters: {}", config.rules.strip_query_parameters);

    println!("\nSelection:");
    println!("  Entity: {}", config.selection.entity);
    println!("  Status filter: {}", config.selection.status_filter);

    println!("\nNotification:");
    println!("  Recipients: {}", config.notification.recipients.join(", "));
    println!(
        "  Reassurance: {} ({})",
        config.notification.send_reassurance_email, config.notification.reassurance_day
    );

    println!("\nTargets ({}):", config.targets.len());
    let mut total = 0;
    for target in &config.targets {
        let results = monitor.prepare_target(target);
        total += results.url_count();
        println!("  - {} ({} urls)", target.name, results.url_count());
        for url in results.urls() {
            println!("    * {}", url);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would check {} unique URLs", total);
}

/// Prints the run summary to stdout
fn print_summary(report: &MonitorReport) {
    println!("=== Landing Page Monitor ===\n");
    println!("{}\n", report.summary.title);

    for target in report.target_summaries() {
        println!(
            "  {}: {} urls, {} errors, {} warnings, {} content errors",
            target.name, target.urls_checked, target.errors, target.warnings, target.content_errors
        );
    }

    println!();
    if report.notified {
        println!("Notification sent.");
    } else if report.summary.should_notify {
        println!("Notification due but not sent.");
    } else {
        println!("Nothing to report, no notification sent.");
    }
}
