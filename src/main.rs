//! gemini-wrapped - Generate your Gemini CLI year-in-review stats card

use clap::Parser;
use gemini_wrapped::{
    aggregation::Aggregator,
    cli::{Cli, validate_year},
    collector::SnapshotCollector,
    error::{Result, WrappedError},
    output::get_formatter,
    period::{Period, check_availability},
    pricing::CostCalculator,
    reconciler::reconcile,
    timezone::TimezoneConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default; -v raises to info, RUST_LOG always wins
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("gemini_wrapped=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let interactive = is_terminal::is_terminal(std::io::stdout());
    if !interactive {
        colored::control::set_override(false);
    }

    validate_year(cli.year)?;

    let timezone = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", timezone.display_name());

    if let Some(year) = cli.year {
        let today = timezone.date_of(&chrono::Utc::now());
        if let Err(e) = check_availability(year, today) {
            eprintln!("{e}");
            return Ok(());
        }
    }

    let collector = match SnapshotCollector::new() {
        Ok(collector) => collector,
        Err(WrappedError::NoGeminiDirectory) => {
            eprintln!("Gemini CLI data not found in ~/.gemini/tmp");
            eprintln!("Make sure you have used Gemini CLI at least once.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let period = Period::resolve(cli.year, &timezone);
    info!(
        "Analyzing {} ({} to {})",
        period.label, period.start_date, period.end_date
    );

    let spinner = if interactive && !cli.json {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Scanning your Gemini CLI history...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = collector.collect_in_period(&period, &timezone).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if outcome.snapshots.is_empty() {
        eprintln!("No Gemini CLI activity found for {}", period.label);
        return Ok(());
    }

    let sessions = reconcile(outcome.snapshots);
    let aggregator = Aggregator::new(CostCalculator::new(), timezone);
    let stats = aggregator.aggregate(&sessions, &period, outcome.first_session_start);

    let formatter = get_formatter(cli.json, cli.full_model_names);
    println!("{}", formatter.format_wrapped(&stats));

    Ok(())
}
