//! convopulse - CLI tool to compute engagement analytics from chat
//! interaction logs
//!
//! Normalizes a raw log export, computes the engagement metrics, and writes
//! the report artifacts (HTML dashboard, CSV summary, JSON).

use anyhow::{Context, Result};
use clap::Parser;
use convopulse_core::format::{format_count, format_minutes, format_percent, format_rate};
use convopulse_core::report::{key_insights, Health, ReportWriter};
use convopulse_core::{Config, CsvNormalizer, MetricsEngine};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convopulse")]
#[command(about = "Compute user engagement analytics from chat interaction logs")]
#[command(version)]
struct Args {
    /// Interaction log CSV to analyze
    input: PathBuf,

    /// Output directory for report artifacts
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Config file path (defaults to the XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for the terminal summary: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Initialize logging
    let _log_guard = convopulse_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    tracing::info!(input = %args.input.display(), "Starting analysis");

    // Normalize the raw log
    let result = CsvNormalizer::new()
        .normalize_file(&args.input)
        .with_context(|| format!("failed to read log {}", args.input.display()))?;

    if result.rows_skipped > 0 {
        eprintln!(
            "Warning: skipped {} of {} rows (see log for details)",
            result.rows_skipped, result.rows_read
        );
    }
    if result.events.is_empty() {
        anyhow::bail!("no usable events in {}", args.input.display());
    }

    // Compute metrics
    let engine = MetricsEngine::new(config.metrics.to_engine_config());
    let metrics = engine.compute(&result.events);

    // Write report artifacts
    let paths = ReportWriter::new(&args.output)
        .write_all(&metrics)
        .context("failed to write reports")?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        "text" => {
            print_summary(&metrics);
            println!("\nReports:");
            println!("  dashboard: {}", paths.html.display());
            println!("  summary:   {}", paths.summary.display());
            println!("  metrics:   {}", paths.json.display());
        }
        other => anyhow::bail!("unknown format '{}' (expected text or json)", other),
    }

    Ok(())
}

fn print_summary(metrics: &convopulse_core::EngagementMetrics) {
    println!("Analysis complete");
    println!();
    println!("Key results:");
    println!("  Total users:          {}", format_count(metrics.total_users));
    println!("  Total interactions:   {}", format_count(metrics.total_events));
    println!(
        "  Avg daily active:     {}",
        format_rate(metrics.avg_daily_active_users)
    );
    println!(
        "  Avg session duration: {}",
        format_minutes(metrics.avg_session_duration)
    );
    for (label, rate) in &metrics.retention_rates {
        println!(
            "  {} retention:     {}",
            label.replace('_', "-"),
            format_percent(*rate)
        );
    }
    println!("  Churn rate:           {}", format_percent(metrics.churn_rate));

    let mut features: Vec<(&String, &u64)> = metrics.feature_usage.iter().collect();
    features.sort_by(|a, b| b.1.cmp(a.1));
    if !features.is_empty() {
        println!();
        println!("Top features:");
        for (name, count) in features.iter().take(5) {
            println!("  {}: {} uses", name, count);
        }
    }

    println!();
    println!("Insights:");
    for insight in key_insights(metrics) {
        let marker = match insight.health {
            Health::Good => "+",
            Health::Moderate => "~",
            Health::Poor => "!",
        };
        println!("  [{}] {}", marker, insight.text);
    }
}
