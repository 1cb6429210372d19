//! Common error types for services

use thiserror::Error;

/// Backtest pipeline error types
///
/// Degenerate statistical conditions (zero volatility, zero drawdown, zero
/// gross loss) are not errors; each metric defines its own fallback value.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// Input rejected before simulation: missing required columns,
    /// invalid configuration, or no usable rows after trimming
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Malformed data discovered during ingestion or simulation;
    /// never recovered mid-pipeline, partial results are never returned
    #[error("Data error: {0}")]
    Data(String),
}
