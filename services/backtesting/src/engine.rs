//! Backtest engine: position sizing and return compounding
//!
//! Converts a price/forecast series into per-period returns, a lagged
//! position series, and compounded equity curves for both the strategy and
//! the raw asset.

use chrono::{DateTime, Utc};
use services_common::{BacktestError, FORECAST_SCALE, PricePoint, SimulationRow};
use tracing::debug;

use crate::config::BacktestConfig;

/// Simulate holding a leveraged position sized by the forecast
///
/// Rows are sorted by timestamp when the dataset carries one, and rows with
/// an undefined forecast are dropped before simulation; an empty remainder
/// is a validation error. For each retained period `i`:
///
/// - `asset_return[i] = close[i] / close[i-1] - 1` (0 for the first row)
/// - `position[i] = (forecast[i] / 10) * leverage`, unclamped
/// - `shifted_position[i] = position[i-1]` (0 for the first row), so the
///   return realized on period `i` uses only information available at the
///   close of period `i - 1`
/// - `strategy_return[i] = asset_return[i] * shifted_position[i]`
///
/// Both equity curves compound `(1 + return)` from the initial capital.
/// Pure and deterministic; no side effects.
pub fn run_backtest(
    points: &[PricePoint],
    config: &BacktestConfig,
) -> Result<Vec<SimulationRow>, BacktestError> {
    config.validate()?;

    let mut points = points.to_vec();

    let stamped = points.iter().filter(|p| p.timestamp.is_some()).count();
    if stamped != 0 && stamped != points.len() {
        return Err(BacktestError::Validation(
            "timestamps must be present on every row or on none".to_string(),
        ));
    }
    if stamped == points.len() {
        points.sort_by_key(|p| p.timestamp);
    }

    // Simulation starts once the forecast is available
    let usable: Vec<(Option<DateTime<Utc>>, f64, f64)> = points
        .iter()
        .filter_map(|p| match p.forecast {
            Some(f) if f.is_finite() => Some((p.timestamp, p.close, f)),
            _ => None,
        })
        .collect();

    if usable.is_empty() {
        return Err(BacktestError::Validation(
            "no valid forecast data found".to_string(),
        ));
    }

    let mut rows: Vec<SimulationRow> = Vec::with_capacity(usable.len());
    let mut asset_equity = config.initial_capital;
    let mut strategy_equity = config.initial_capital;

    for (index, &(timestamp, close, forecast)) in usable.iter().enumerate() {
        if !close.is_finite() {
            return Err(BacktestError::Data(format!(
                "non-finite close at period {index}"
            )));
        }

        let asset_return = if index == 0 {
            0.0
        } else {
            close / usable[index - 1].1 - 1.0
        };
        let position = (forecast / FORECAST_SCALE) * config.leverage;
        let shifted_position = if index == 0 {
            0.0
        } else {
            rows[index - 1].position
        };
        let strategy_return = asset_return * shifted_position;

        asset_equity *= 1.0 + asset_return;
        strategy_equity *= 1.0 + strategy_return;

        rows.push(SimulationRow {
            index,
            timestamp,
            close,
            forecast,
            asset_return,
            position,
            shifted_position,
            strategy_return,
            asset_equity,
            strategy_equity,
        });
    }

    debug!("Simulated {} periods", rows.len());
    Ok(rows)
}
