//! Forecast signal backtesting
//!
//! Evaluates a numeric forecast signal against historical prices: simulates
//! holding a leveraged position sized by the forecast, reconstructs the
//! discrete directional trades behind the position series, and computes
//! risk/return statistics for the strategy and its buy-and-hold baseline.
//!
//! The simulation is a pure, synchronous function of its input. Its defining
//! contract is the one-period lag: the position earning the return of period
//! `i` is always the one decided at the close of period `i - 1`, which rules
//! out lookahead bias.

pub mod config;
pub mod engine;
pub mod loader;
pub mod performance;
pub mod report;
pub mod trades;

pub use config::BacktestConfig;
pub use engine::run_backtest;
pub use loader::load_csv;
pub use performance::{PeriodMetrics, TradeMetrics, period_metrics, trade_metrics};
pub use report::{BacktestReport, run_pipeline};
pub use trades::segment_trades;
