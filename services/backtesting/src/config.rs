//! Backtest run configuration

use serde::{Deserialize, Serialize};
use services_common::{
    BacktestError, DEFAULT_INITIAL_CAPITAL, DEFAULT_LEVERAGE, DEFAULT_PERIODS_PER_YEAR,
    DEFAULT_RISK_FREE_RATE,
};

/// Configuration for one backtest run
///
/// All fields have serde defaults, so a partial JSON config deserializes
/// with the standard values filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Starting capital, must be positive
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    /// Multiplier for the strategy position size (practical range 0.1 - 10.0)
    #[serde(default = "default_leverage")]
    pub leverage: f64,

    /// Annual risk-free rate, fractional (0.02 = 2%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Annualization factor, e.g. 252 for daily bars, 756 for 8h bars.
    /// Caller-supplied; never inferred from timestamp spacing.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}
fn default_leverage() -> f64 {
    DEFAULT_LEVERAGE
}
fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}
fn default_periods_per_year() -> u32 {
    DEFAULT_PERIODS_PER_YEAR
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            leverage: default_leverage(),
            risk_free_rate: default_risk_free_rate(),
            periods_per_year: default_periods_per_year(),
        }
    }
}

impl BacktestConfig {
    /// Create a configuration with the given capital and defaults elsewhere
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            ..Default::default()
        }
    }

    /// Set the leverage multiplier
    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = leverage;
        self
    }

    /// Set the annual risk-free rate
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Set the annualization factor
    pub fn with_periods_per_year(mut self, periods: u32) -> Self {
        self.periods_per_year = periods;
        self
    }

    /// Validate the configuration before a run
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !(self.initial_capital > 0.0) {
            return Err(BacktestError::Validation(
                "initial capital must be positive".to_string(),
            ));
        }
        if !(self.leverage > 0.0) {
            return Err(BacktestError::Validation(
                "leverage must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::Validation(
                "risk-free rate must be finite".to_string(),
            ));
        }
        if self.periods_per_year == 0 {
            return Err(BacktestError::Validation(
                "annualization factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
