//! Trade segmentation
//!
//! Reconstructs discrete directional trades from the continuous position
//! series: a trade is a maximal run of periods with a constant, non-zero
//! forecast sign, delimited by sign flips or transitions to flat.

use chrono::{DateTime, Utc};
use services_common::{SimulationRow, Trade, TradeDirection};
use tracing::debug;

/// Sign state of the forecast signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalState {
    Flat,
    Long,
    Short,
}

impl SignalState {
    fn of(forecast: f64) -> Self {
        if forecast > 0.0 {
            Self::Long
        } else if forecast < 0.0 {
            Self::Short
        } else {
            Self::Flat
        }
    }

    fn direction(self) -> Option<TradeDirection> {
        match self {
            Self::Long => Some(TradeDirection::Long),
            Self::Short => Some(TradeDirection::Short),
            Self::Flat => None,
        }
    }
}

/// A directional run that has not closed yet
struct OpenTrade {
    start_index: usize,
    start_time: Option<DateTime<Utc>>,
    direction: TradeDirection,
    entry_equity: f64,
}

impl OpenTrade {
    fn close(self, exit: &SimulationRow, duration: usize) -> Trade {
        Trade {
            start_index: self.start_index,
            end_index: exit.index,
            start_time: self.start_time,
            end_time: exit.timestamp,
            direction: self.direction,
            pnl: exit.strategy_equity / self.entry_equity - 1.0,
            pnl_abs: exit.strategy_equity - self.entry_equity,
            duration,
        }
    }
}

/// Segment the simulated series into discrete trades
///
/// A single pass drives a three-state machine (flat/long/short) over the
/// forecast sign, with the state before the first row defined as flat so the
/// first entry and every later re-entry share one transition rule. A zero
/// forecast always means flat; trades never merge across a flat gap. A
/// direct long/short flip closes and reopens at the same index with no gap.
/// Equity compounds continuously across trades.
///
/// Assumes its input satisfies the engine's postconditions and performs no
/// validation of its own; empty input yields an empty sequence.
pub fn segment_trades(rows: &[SimulationRow], initial_capital: f64) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut state = SignalState::Flat;
    let mut open: Option<OpenTrade> = None;

    for row in rows {
        let next = SignalState::of(row.forecast);
        if next == state {
            continue;
        }

        // The return realized here was driven by the position held through
        // the previous period, so it still belongs to the closing trade.
        if let Some(trade) = open.take() {
            let duration = row.index - trade.start_index;
            trades.push(trade.close(row, duration));
        }

        if let Some(direction) = next.direction() {
            // Equity at this row is the basis before the new position
            // accrues: the lagged return here still carries the old
            // position, and the first row's return is zero by construction.
            let entry_equity = if row.index == 0 {
                initial_capital
            } else {
                row.strategy_equity
            };
            open = Some(OpenTrade {
                start_index: row.index,
                start_time: row.timestamp,
                direction,
                entry_equity,
            });
        }

        state = next;
    }

    // Still directional at stream exhaustion: force a close on the last row
    if let (Some(trade), Some(last)) = (open, rows.last()) {
        let duration = rows.len() - trade.start_index;
        trades.push(trade.close(last, duration));
    }

    debug!("Segmented {} trades from {} rows", trades.len(), rows.len());
    trades
}
