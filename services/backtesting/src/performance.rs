//! Performance metrics
//!
//! Period-level risk/return ratios computed from a return series, and
//! trade-level aggregates computed from the segmented trade list.

use serde::{Deserialize, Serialize};
use services_common::{CVAR_TAIL_PERCENTILE, Trade};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Annualized risk/return statistics for one period-return series
///
/// Computed independently for the strategy and the buy-and-hold baseline.
/// Degenerate inputs (zero volatility, zero downside deviation, zero
/// drawdown, zero years) are not errors; each ratio falls back to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// Compounded return over the whole series
    pub total_return: f64,

    /// Compound annual growth rate; 0 when the series spans no time
    pub cagr: f64,

    /// Annualized standard deviation of period returns
    pub volatility: f64,

    /// Annualized excess return per unit of volatility
    pub sharpe_ratio: f64,

    /// Like Sharpe, but risk is the deviation of negative returns only
    pub sortino_ratio: f64,

    /// CAGR per unit of maximum drawdown
    pub calmar_ratio: f64,

    /// Most negative peak-to-trough decline of the compounded curve
    pub max_drawdown: f64,

    /// Mean of the strictly negative drawdown observations; periods at a
    /// new high are excluded, not counted as zero
    pub avg_drawdown: f64,

    /// 5th percentile of the return distribution. A single-point quantile
    /// estimate, not a conditional tail mean, despite the name the reports
    /// carry for it.
    pub cvar_95: f64,
}

/// Aggregates over the discrete trade list
///
/// One fixed schema regardless of input size: an empty trade list yields
/// all-zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    /// Number of completed trades
    pub total_trades: usize,

    /// Fraction of trades with positive P&L
    pub win_rate: f64,

    /// Mean fractional P&L across all trades
    pub avg_trade: f64,

    /// Mean fractional P&L of winning trades
    pub avg_win: f64,

    /// Mean fractional P&L of losing trades (non-positive)
    pub avg_loss: f64,

    /// Mean holding length in periods
    pub avg_duration: f64,

    /// Gross profit over gross loss in capital units; infinite when the
    /// sample has no losing trade
    pub profit_factor: f64,

    /// Expected fractional P&L per trade:
    /// `win_rate * avg_win + (1 - win_rate) * avg_loss`
    pub expectancy: f64,
}

/// Compute annualized risk/return statistics for a period-return series
pub fn period_metrics(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> PeriodMetrics {
    if returns.is_empty() {
        return PeriodMetrics::default();
    }

    let annual = f64::from(periods_per_year);

    let total_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;

    let years = returns.len() as f64 / annual;
    let cagr = if years > 0.0 {
        (1.0 + total_return).powf(1.0 / years) - 1.0
    } else {
        0.0
    };

    let mean_annualized = (&returns[..]).mean() * annual;

    // Sample (n-1) standard deviation; fewer than two observations have no
    // spread, which maps onto the zero-volatility fallback below
    let volatility = if returns.len() < 2 {
        0.0
    } else {
        (&returns[..]).std_dev() * annual.sqrt()
    };
    let sharpe_ratio = if volatility != 0.0 {
        (mean_annualized - risk_free_rate) / volatility
    } else {
        0.0
    };

    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_dev = if downside.len() < 2 {
        0.0
    } else {
        (&downside[..]).std_dev() * annual.sqrt()
    };
    let sortino_ratio = if downside_dev != 0.0 {
        (mean_annualized - risk_free_rate) / downside_dev
    } else {
        0.0
    };

    let (max_drawdown, avg_drawdown) = drawdown_stats(returns);
    let calmar_ratio = if max_drawdown != 0.0 {
        cagr / max_drawdown.abs()
    } else {
        0.0
    };

    let mut data = Data::new(returns.to_vec());
    let cvar_95 = data.percentile(CVAR_TAIL_PERCENTILE);

    PeriodMetrics {
        total_return,
        cagr,
        volatility,
        sharpe_ratio,
        sortino_ratio,
        calmar_ratio,
        max_drawdown,
        avg_drawdown,
        cvar_95,
    }
}

/// Drawdown of the compounded curve against its running peak
///
/// Returns (most negative drawdown, mean of strictly negative drawdowns).
fn drawdown_stats(returns: &[f64]) -> (f64, f64) {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown: f64 = 0.0;
    let mut negative_sum = 0.0;
    let mut negative_count = 0usize;

    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = (cumulative - peak) / peak;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
        if drawdown < 0.0 {
            negative_sum += drawdown;
            negative_count += 1;
        }
    }

    let avg_drawdown = if negative_count > 0 {
        negative_sum / negative_count as f64
    } else {
        0.0
    };
    (max_drawdown, avg_drawdown)
}

/// Compute aggregates over the discrete trade list
pub fn trade_metrics(trades: &[Trade]) -> TradeMetrics {
    if trades.is_empty() {
        return TradeMetrics::default();
    }

    let total = trades.len() as f64;
    let wins: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_winner())
        .map(|t| t.pnl)
        .collect();
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl)
        .collect();

    let win_rate = wins.len() as f64 / total;
    let avg_trade = trades.iter().map(|t| t.pnl).sum::<f64>() / total;
    let avg_win = if wins.is_empty() {
        0.0
    } else {
        wins.iter().sum::<f64>() / wins.len() as f64
    };
    let avg_loss = if losses.is_empty() {
        0.0
    } else {
        losses.iter().sum::<f64>() / losses.len() as f64
    };
    let avg_duration = trades.iter().map(|t| t.duration as f64).sum::<f64>() / total;

    let gross_profit: f64 = trades.iter().map(|t| t.pnl_abs).filter(|p| *p > 0.0).sum();
    let gross_loss: f64 = trades
        .iter()
        .map(|t| t.pnl_abs)
        .filter(|p| *p < 0.0)
        .sum::<f64>()
        .abs();
    // Zero gross loss means an undefeated sample; the factor is infinite,
    // not an error
    let profit_factor = if gross_loss != 0.0 {
        gross_profit / gross_loss
    } else {
        f64::INFINITY
    };

    let expectancy = win_rate * avg_win + (1.0 - win_rate) * avg_loss;

    TradeMetrics {
        total_trades: trades.len(),
        win_rate,
        avg_trade,
        avg_win,
        avg_loss,
        avg_duration,
        profit_factor,
        expectancy,
    }
}
