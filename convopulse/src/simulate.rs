//! convopulse-simulate - CLI tool to generate synthetic interaction logs
//!
//! Writes a CSV log in the raw export schema, suitable as input to
//! `convopulse`.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use convopulse_core::{Config, Scenario, Simulator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convopulse-simulate")]
#[command(about = "Generate a synthetic chat interaction log")]
#[command(version)]
struct Args {
    /// Number of users to simulate
    #[arg(short, long, default_value_t = 500)]
    users: u32,

    /// Number of days to cover
    #[arg(short, long, default_value_t = 60)]
    days: u32,

    /// Scenario: standard, high_engagement, low_retention, rapid_growth
    #[arg(short, long, default_value = "standard")]
    scenario: String,

    /// Output file
    #[arg(short, long, default_value = "generated_data.csv")]
    output: PathBuf,

    /// RNG seed for reproducible output (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = convopulse_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let scenario: Scenario = args
        .scenario
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let seed = args.seed.unwrap_or_else(rand_seed);

    let csv = Simulator::new(scenario, seed).generate(args.users, args.days, Utc::now().date_naive());
    let rows = csv.lines().count().saturating_sub(1);

    std::fs::write(&args.output, csv)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Generated {} interactions ({} users, {} days, scenario {}, seed {})",
        rows, args.users, args.days, scenario, seed
    );
    println!("Saved to {}", args.output.display());

    Ok(())
}

/// Seed from the clock when none was given.
fn rand_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
