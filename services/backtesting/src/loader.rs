//! CSV ingestion and signal normalization
//!
//! Coerces flexible column headers onto the required schema, parses
//! timestamps, and marks missing forecast cells so the engine can trim the
//! signal warm-up prefix.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use services_common::{BacktestError, PricePoint};
use std::io::Read;
use tracing::debug;

/// Header names accepted for the time column, checked in order
const TIMESTAMP_HEADERS: [&str; 3] = ["date", "time", "timestamp"];

/// Read a price/forecast CSV into a sequence of [`PricePoint`]s
///
/// Headers are matched case-insensitively. `close` and `forecast` are
/// required; any of `date`, `time`, or `timestamp` selects the time column.
/// Blank or non-finite forecast cells become `None` (the unfilled warm-up
/// prefix of the signal); blank close or timestamp cells are data errors.
pub fn load_csv<R: Read>(reader: R) -> Result<Vec<PricePoint>, BacktestError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| BacktestError::Data(format!("failed to read CSV header: {e}")))?
        .clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let (close_idx, forecast_idx) = match (find("close"), find("forecast")) {
        (Some(close), Some(forecast)) => (close, forecast),
        _ => {
            return Err(BacktestError::Validation(
                "CSV must contain 'close' and 'forecast' columns".to_string(),
            ));
        }
    };
    let timestamp_idx = TIMESTAMP_HEADERS.iter().find_map(|name| find(name));

    let mut points = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 1;
        let record = record.map_err(|e| BacktestError::Data(format!("row {line}: {e}")))?;

        let close = parse_close(&record, close_idx, line)?;
        let forecast = parse_forecast(&record, forecast_idx, line)?;
        let timestamp = timestamp_idx
            .map(|idx| parse_timestamp(cell(&record, idx), line))
            .transpose()?;

        points.push(PricePoint {
            timestamp,
            close,
            forecast,
        });
    }

    debug!("Parsed {} rows from CSV", points.len());
    Ok(points)
}

fn cell(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_close(record: &csv::StringRecord, idx: usize, line: usize) -> Result<f64, BacktestError> {
    let cell = cell(record, idx);
    if cell.is_empty() {
        return Err(BacktestError::Data(format!("row {line}: missing close")));
    }
    cell.parse()
        .map_err(|_| BacktestError::Data(format!("row {line}: unparseable close '{cell}'")))
}

fn parse_forecast(
    record: &csv::StringRecord,
    idx: usize,
    line: usize,
) -> Result<Option<f64>, BacktestError> {
    let cell = cell(record, idx);
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| BacktestError::Data(format!("row {line}: unparseable forecast '{cell}'")))?;
    // A NaN cell means the signal was not yet defined, same as blank
    Ok(value.is_finite().then_some(value))
}

fn parse_timestamp(cell: &str, line: usize) -> Result<DateTime<Utc>, BacktestError> {
    if cell.is_empty() {
        return Err(BacktestError::Data(format!("row {line}: missing timestamp")));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(BacktestError::Data(format!(
        "row {line}: unrecognized timestamp '{cell}'"
    )))
}
