//! Test utilities and factories for backtesting tests

use backtesting::BacktestConfig;
use chrono::{DateTime, Duration, TimeZone, Utc};
use services_common::PricePoint;

/// Factory for creating test configurations
pub struct TestConfigFactory;

impl TestConfigFactory {
    /// Unit-friendly configuration: 1000 capital, no leverage, zero
    /// risk-free rate
    pub fn basic_config() -> BacktestConfig {
        BacktestConfig {
            initial_capital: 1_000.0,
            leverage: 1.0,
            risk_free_rate: 0.0,
            periods_per_year: 756,
        }
    }

    /// Configuration with leverage and a non-zero risk-free rate
    pub fn leveraged_config() -> BacktestConfig {
        BacktestConfig {
            initial_capital: 10_000.0,
            leverage: 3.0,
            risk_free_rate: 0.02,
            periods_per_year: 252,
        }
    }
}

/// Factory for creating test price/forecast series
pub struct TestDataFactory;

impl TestDataFactory {
    /// Anchor time for stamped series
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Five bars with one long-to-short flip at index 3
    ///
    /// With capital 1000 and leverage 1 the equity curve is exactly
    /// [1000, 1010, 1020, 990, 980].
    pub fn single_flip_points() -> Vec<PricePoint> {
        let closes = [100.0, 101.0, 102.0, 99.0, 100.0];
        let forecasts = [10.0, 10.0, 10.0, -10.0, -10.0];
        closes
            .iter()
            .zip(forecasts)
            .map(|(close, forecast)| PricePoint::new(*close, Some(forecast)))
            .collect()
    }

    /// Constant positive forecast over a gently rising series
    pub fn constant_long_points(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| PricePoint::new(100.0 + i as f64, Some(5.0)))
            .collect()
    }

    /// Forecast is zero on every bar: never invested
    pub fn never_invested_points(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| PricePoint::new(100.0 + (i % 7) as f64, Some(0.0)))
            .collect()
    }

    /// Long run, two flat bars, long run again
    ///
    /// Closes [100, 102, 101, 103, 104, 102] with forecasts
    /// [5, 5, 0, 0, 5, 5]; the equity is flat across the gap.
    pub fn flat_gap_points() -> Vec<PricePoint> {
        let closes = [100.0, 102.0, 101.0, 103.0, 104.0, 102.0];
        let forecasts = [5.0, 5.0, 0.0, 0.0, 5.0, 5.0];
        closes
            .iter()
            .zip(forecasts)
            .map(|(close, forecast)| PricePoint::new(*close, Some(forecast)))
            .collect()
    }

    /// Signal undefined for the first `warmup` bars
    pub fn warmup_points(warmup: usize, count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| {
                let forecast = (i >= warmup).then_some(8.0);
                PricePoint::new(100.0 + i as f64, forecast)
            })
            .collect()
    }

    /// Daily-stamped rising series with a constant long signal
    pub fn stamped_points(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| {
                PricePoint::new(100.0 + i as f64, Some(5.0))
                    .with_timestamp(Self::base_time() + Duration::days(i as i64))
            })
            .collect()
    }
}

/// Test assertion helpers
pub struct TestAssertions;

impl TestAssertions {
    /// Assert that two f64 values are approximately equal
    pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "Values not approximately equal: actual={actual}, expected={expected}, diff={diff}, tolerance={tolerance}"
        );
    }
}
