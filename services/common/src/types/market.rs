//! Input market data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the uploaded price/signal series
///
/// `forecast` may be absent for a leading prefix of the series (the signal
/// warms up after the prices start); the engine trims those rows before
/// simulating. Timestamps are optional: when a dataset carries none, row
/// order defines a synthetic period index used for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation time (UTC); `None` for index-only datasets
    pub timestamp: Option<DateTime<Utc>>,

    /// Closing price for the period
    pub close: f64,

    /// Raw forecast signal; sign is direction, magnitude is conviction
    pub forecast: Option<f64>,
}

impl PricePoint {
    /// Create a point without a timestamp
    pub fn new(close: f64, forecast: Option<f64>) -> Self {
        Self {
            timestamp: None,
            close,
            forecast,
        }
    }

    /// Attach an observation time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
