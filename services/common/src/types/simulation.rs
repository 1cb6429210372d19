//! Simulation output types: derived per-period rows and discrete trades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One simulated period, derived from a retained [`PricePoint`]
///
/// The defining contract is the one-period lag: `strategy_return` is
/// `asset_return * shifted_position`, where `shifted_position` is the
/// previous period's position. The return realized on period `i` therefore
/// depends only on data known at the close of period `i - 1`.
///
/// [`PricePoint`]: crate::types::market::PricePoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRow {
    /// Position of this row in the retained series (reporting key when
    /// the dataset has no timestamps)
    pub index: usize,

    /// Observation time, if the dataset carried one
    pub timestamp: Option<DateTime<Utc>>,

    /// Closing price
    pub close: f64,

    /// Forecast signal (defined for every retained row)
    pub forecast: f64,

    /// Fractional period return of `close`; 0 for the first row
    pub asset_return: f64,

    /// `(forecast / 10) * leverage`, unclamped
    pub position: f64,

    /// Previous row's `position`; 0 for the first row
    pub shifted_position: f64,

    /// `asset_return * shifted_position`
    pub strategy_return: f64,

    /// Buy-and-hold equity, compounded from the initial capital
    pub asset_equity: f64,

    /// Strategy equity, compounded from the initial capital
    pub strategy_equity: f64,
}

/// Direction of a discrete trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "Long"),
            Self::Short => write!(f, "Short"),
        }
    }
}

/// A maximal run of periods with a constant, non-zero forecast sign
///
/// Produced once by the segmenter and immutable thereafter; the full set is
/// reconstructible from a [`SimulationRow`] sequence alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Index of the period where the signal turned directional
    pub start_index: usize,

    /// Index of the period whose return closed the trade
    pub end_index: usize,

    /// Entry time, when the dataset carries timestamps
    pub start_time: Option<DateTime<Utc>>,

    /// Exit time, when the dataset carries timestamps
    pub end_time: Option<DateTime<Utc>>,

    /// Long or short
    pub direction: TradeDirection,

    /// Fractional P&L: exit equity / entry equity - 1
    pub pnl: f64,

    /// P&L in capital units: exit equity - entry equity
    pub pnl_abs: f64,

    /// Holding length in periods
    pub duration: usize,
}

impl Trade {
    /// Whether this trade ended with a profit
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
