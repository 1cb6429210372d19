//! Synthetic signal cycle example
//!
//! Generates a sinusoidal price series with a forecast that flips between
//! long and short regimes, then runs the full pipeline.

use backtesting::{BacktestConfig, run_pipeline};
use services_common::PricePoint;

fn main() -> anyhow::Result<()> {
    println!("Forecast signal backtest example");

    // Ten full price cycles, 24 bars each; the forecast follows the slope
    // of the cycle so the strategy is long while rising, short while falling
    let mut points = Vec::new();
    for i in 0..240 {
        let phase = i as f64 * std::f64::consts::TAU / 24.0;
        let close = 100.0 + 10.0 * phase.sin();
        let forecast = if phase.cos() > 0.0 { 8.0 } else { -8.0 };
        points.push(PricePoint::new(close, Some(forecast)));
    }

    let config = BacktestConfig::default().with_leverage(2.0);
    let report = run_pipeline(&points, &config)?;

    println!("\n{}", report.summary());

    println!("\nFirst trades:");
    for trade in report.trades.iter().take(5) {
        println!(
            "  {} periods {}..{} -> {:+.2}%",
            trade.direction,
            trade.start_index,
            trade.end_index,
            trade.pnl * 100.0
        );
    }

    Ok(())
}
