//! Calculate grant rates for every country in the PPP table
//!
//! Reads the indicator CSVs named in the config file and writes the rate table.

use anyhow::{Context, Result};
use clap::Parser;
use grant_rate_engine::{load_config, pipeline, LogObserver};
use std::path::PathBuf;

/// Countries printed after a successful run
const SAMPLE_COUNTRIES: [&str; 5] = ["USA", "DEU", "IND", "BRA", "JPN"];

#[derive(Debug, Parser)]
#[command(name = "calculate_rates", version, about = "Per-country grant rate calculator")]
struct Args {
    /// JSON config file (base_rate, anchor, weights, paths)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args.config, &LogObserver)
        .with_context(|| format!("loading config {}", args.config.display()))?;

    let report = pipeline::run(&config, &LogObserver).context("rate calculation failed")?;

    println!("\nGenerated rates for {} countries", report.rates.len());
    println!("Output saved to: {}", report.output_path.display());

    println!("\nSample rates:");
    for code in SAMPLE_COUNTRIES {
        if let Some(rate) = report.rate_for(code) {
            println!("  {code}: ${rate:.2}");
        }
    }

    Ok(())
}
