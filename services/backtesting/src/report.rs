//! Pipeline assembly
//!
//! Wires the engine, the trade segmenter, and the metrics layer into one
//! serializable report: the full simulated series, the trade list, period
//! metrics for the strategy and the buy-and-hold baseline, and trade
//! aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services_common::{BacktestError, PricePoint, SimulationRow, Trade};
use tracing::info;

use crate::config::BacktestConfig;
use crate::engine::run_backtest;
use crate::performance::{PeriodMetrics, TradeMetrics, period_metrics, trade_metrics};
use crate::trades::segment_trades;

/// Complete output of one backtest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration the run used
    pub config: BacktestConfig,

    /// Full simulated series
    pub rows: Vec<SimulationRow>,

    /// Discrete directional trades, possibly empty
    pub trades: Vec<Trade>,

    /// Period metrics of the strategy returns
    pub strategy_metrics: PeriodMetrics,

    /// Period metrics of the raw asset returns (buy-and-hold baseline)
    pub asset_metrics: PeriodMetrics,

    /// Aggregates over the trade list
    pub trade_metrics: TradeMetrics,

    /// Number of simulated periods
    pub data_points: usize,

    /// First simulated period, when the dataset carries timestamps
    pub start_time: Option<DateTime<Utc>>,

    /// Last simulated period, when the dataset carries timestamps
    pub end_time: Option<DateTime<Utc>>,
}

/// Run the full pipeline: simulate, segment, and measure
///
/// No side effects beyond tracing; partial results are never returned.
pub fn run_pipeline(
    points: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestReport, BacktestError> {
    let rows = run_backtest(points, config)?;
    let trades = segment_trades(&rows, config.initial_capital);

    let strategy_returns: Vec<f64> = rows.iter().map(|r| r.strategy_return).collect();
    let asset_returns: Vec<f64> = rows.iter().map(|r| r.asset_return).collect();

    let strategy_metrics = period_metrics(
        &strategy_returns,
        config.risk_free_rate,
        config.periods_per_year,
    );
    let asset_metrics = period_metrics(
        &asset_returns,
        config.risk_free_rate,
        config.periods_per_year,
    );
    let trade_stats = trade_metrics(&trades);

    info!(
        "Backtest complete - Return: {:.2}%, Sharpe: {:.2}, Trades: {}",
        strategy_metrics.total_return * 100.0,
        strategy_metrics.sharpe_ratio,
        trades.len()
    );

    Ok(BacktestReport {
        config: config.clone(),
        data_points: rows.len(),
        start_time: rows.first().and_then(|r| r.timestamp),
        end_time: rows.last().and_then(|r| r.timestamp),
        strategy_metrics,
        asset_metrics,
        trade_metrics: trade_stats,
        trades,
        rows,
    })
}

impl BacktestReport {
    /// Final strategy equity, or the initial capital for an empty run
    pub fn final_equity(&self) -> f64 {
        self.rows
            .last()
            .map_or(self.config.initial_capital, |r| r.strategy_equity)
    }

    /// Human-readable results block
    pub fn summary(&self) -> String {
        let period = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                format!("{} -> {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            _ => format!("periods 0 -> {}", self.data_points.saturating_sub(1)),
        };

        format!(
            "=== Backtest Results ===\n\
             Period: {} ({} data points)\n\
             Final Equity: {:.2} (from {:.2})\n\
             Total Return: {:.2}% (asset: {:.2}%)\n\
             CAGR: {:.2}%\n\
             Volatility: {:.2}%\n\
             Sharpe Ratio: {:.2}\n\
             Sortino Ratio: {:.2}\n\
             Calmar Ratio: {:.2}\n\
             Max Drawdown: {:.2}%\n\
             CVaR (95%): {:.2}%\n\
             Total Trades: {}\n\
             Win Rate: {:.1}%\n\
             Profit Factor: {:.2}",
            period,
            self.data_points,
            self.final_equity(),
            self.config.initial_capital,
            self.strategy_metrics.total_return * 100.0,
            self.asset_metrics.total_return * 100.0,
            self.strategy_metrics.cagr * 100.0,
            self.strategy_metrics.volatility * 100.0,
            self.strategy_metrics.sharpe_ratio,
            self.strategy_metrics.sortino_ratio,
            self.strategy_metrics.calmar_ratio,
            self.strategy_metrics.max_drawdown * 100.0,
            self.strategy_metrics.cvar_95 * 100.0,
            self.trade_metrics.total_trades,
            self.trade_metrics.win_rate * 100.0,
            self.trade_metrics.profit_factor,
        )
    }
}
