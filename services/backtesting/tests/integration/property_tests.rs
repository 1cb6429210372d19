//! Property tests for the simulation's temporal and accounting laws

use backtesting::{BacktestConfig, run_backtest, segment_trades};
use proptest::prelude::*;
use services_common::PricePoint;

fn points_from(data: &[(f64, f64)]) -> Vec<PricePoint> {
    data.iter()
        .map(|&(close, forecast)| PricePoint::new(close, Some(forecast)))
        .collect()
}

fn bars() -> impl Strategy<Value = Vec<(f64, f64)>> {
    // Bounded closes keep compounded equity finite even at high exposure
    prop::collection::vec((50.0f64..150.0, -50.0f64..50.0), 2..40)
}

proptest! {
    /// Perturbing the forecast of period `i` must never change the return
    /// realized on period `i`; only later periods may move.
    #[test]
    fn forecasts_only_affect_later_returns(
        data in bars(),
        idx in any::<prop::sample::Index>(),
    ) {
        let config = BacktestConfig::new(1_000.0);
        let i = idx.index(data.len());

        let baseline = run_backtest(&points_from(&data), &config).unwrap();

        let mut perturbed = data.clone();
        perturbed[i].1 += 7.5;
        let rows = run_backtest(&points_from(&perturbed), &config).unwrap();

        for j in 0..=i {
            prop_assert_eq!(rows[j].strategy_return, baseline[j].strategy_return);
            prop_assert_eq!(rows[j].strategy_equity, baseline[j].strategy_equity);
        }
    }

    /// The trade ledger always reconciles with the equity curve: flat gaps
    /// freeze equity, so the per-trade P&L telescopes to the total move.
    #[test]
    fn trade_ledger_reconciles_with_equity(data in bars()) {
        let initial_capital = 1_000.0;
        let config = BacktestConfig::new(initial_capital);

        let rows = run_backtest(&points_from(&data), &config).unwrap();
        let trades = segment_trades(&rows, initial_capital);

        let ledger_total: f64 = trades.iter().map(|t| t.pnl_abs).sum();
        let equity_move = rows.last().unwrap().strategy_equity - initial_capital;

        let scale = equity_move.abs().max(initial_capital);
        prop_assert!((ledger_total - equity_move).abs() <= 1e-9 * scale);
    }

    /// The engine is a pure function: identical input, identical output.
    #[test]
    fn simulation_is_idempotent(data in bars()) {
        let config = BacktestConfig::new(25_000.0).with_leverage(2.0);

        let first = run_backtest(&points_from(&data), &config).unwrap();
        let second = run_backtest(&points_from(&data), &config).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Trades are ordered, non-overlapping, and bounded by sign changes.
    #[test]
    fn trades_partition_the_directional_periods(data in bars()) {
        let config = BacktestConfig::new(1_000.0);

        let rows = run_backtest(&points_from(&data), &config).unwrap();
        let trades = segment_trades(&rows, config.initial_capital);

        // f64::signum maps 0.0 to 1.0, so classify flat explicitly
        let sign = |f: f64| {
            if f > 0.0 {
                1
            } else if f < 0.0 {
                -1
            } else {
                0
            }
        };
        let sign_changes = rows
            .windows(2)
            .filter(|pair| sign(pair[0].forecast) != sign(pair[1].forecast))
            .count();
        prop_assert!(trades.len() <= sign_changes + 1);

        for pair in trades.windows(2) {
            // A flip closes and reopens at the same index; otherwise the
            // next trade starts strictly later
            prop_assert!(pair[0].end_index <= pair[1].start_index);
            prop_assert!(pair[0].start_index < pair[1].start_index);
        }
        for trade in &trades {
            prop_assert!(trade.start_index <= trade.end_index);
            prop_assert!(trade.duration >= 1);
        }
    }
}
