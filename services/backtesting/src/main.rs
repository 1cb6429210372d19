//! Backtesting CLI entry point
//!
//! Loads a price/forecast CSV, runs the simulation pipeline, and prints the
//! resulting statistics. Stands in for the dashboard presentation layer.

use anyhow::{Context, Result};
use backtesting::{BacktestConfig, load_csv, run_pipeline};
use clap::Parser;
use services_common::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_LEVERAGE, DEFAULT_PERIODS_PER_YEAR, DEFAULT_RISK_FREE_RATE,
};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "backtesting",
    about = "Evaluate a forecast signal against historical prices"
)]
struct Cli {
    /// CSV file with 'close' and 'forecast' columns and an optional
    /// 'date'/'time'/'timestamp' column
    input: PathBuf,

    /// Starting capital
    #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
    initial_capital: f64,

    /// Multiplier for the strategy position size
    #[arg(long, default_value_t = DEFAULT_LEVERAGE)]
    leverage: f64,

    /// Annual risk-free rate, fractional (0.02 = 2%)
    #[arg(long, default_value_t = DEFAULT_RISK_FREE_RATE)]
    risk_free_rate: f64,

    /// Annualization factor, e.g. 252 for daily bars, 756 for 8h bars
    #[arg(long, default_value_t = DEFAULT_PERIODS_PER_YEAR)]
    periods_per_year: u32,

    /// Write the full report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let points = load_csv(file)?;
    info!(
        "Loaded {} data points from {}",
        points.len(),
        cli.input.display()
    );

    let config = BacktestConfig {
        initial_capital: cli.initial_capital,
        leverage: cli.leverage,
        risk_free_rate: cli.risk_free_rate,
        periods_per_year: cli.periods_per_year,
    };

    let report = run_pipeline(&points, &config)?;
    println!("{}", report.summary());

    if let Some(path) = cli.output {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
