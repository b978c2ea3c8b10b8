use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use screener_core::{DataError, PricePoint};
use std::io::Read;
use std::path::Path;

/// Load closing prices from a CSV file.
///
/// Expected columns (case-insensitive, flexible ordering):
/// `timestamp` (or `date`, `datetime`, `time`) and `close` (or `c`, `adj_close`).
/// Other columns are ignored.
///
/// Rows are returned in file order. Ordering is checked later by
/// `PriceSeries::new`, so a shuffled file is reported rather than re-sorted.
pub fn load_points_from_csv(path: &Path) -> Result<Vec<PricePoint>, DataError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("Failed to open CSV {}: {}", path.display(), e)))?;
    let points = read_points(reader)?;
    tracing::debug!(path = %path.display(), points = points.len(), "Loaded CSV prices");
    Ok(points)
}

/// Same as [`load_points_from_csv`] for any reader.
pub fn load_points_from_reader<R: Read>(input: R) -> Result<Vec<PricePoint>, DataError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    read_points(reader)
}

fn read_points<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<PricePoint>, DataError> {
    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("Failed to read headers: {}", e)))?
        .clone();

    let ts_col = find_column(&headers, &["timestamp", "date", "datetime", "time"])
        .ok_or_else(|| DataError::ParseError("No timestamp column found".into()))?;
    let close_col = find_column(&headers, &["close", "c", "adj_close"])
        .ok_or_else(|| DataError::ParseError("No close column found".into()))?;

    let mut points = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::ParseError(format!("CSV record error: {}", e)))?;
        let field = |col: usize| {
            record.get(col).ok_or_else(|| {
                DataError::ParseError(format!("Row {} is missing column {}", row + 1, col + 1))
            })
        };

        let timestamp = parse_timestamp(field(ts_col)?)?;
        let close = parse_price(field(close_col)?)?;
        points.push(PricePoint::new(timestamp, close));
    }

    Ok(points)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    for name in names {
        if let Some(i) = headers
            .iter()
            .position(|header| header.trim().to_lowercase() == *name)
        {
            return Some(i);
        }
    }
    None
}

fn parse_price(s: &str) -> Result<f64, DataError> {
    s.trim()
        .parse::<f64>()
        .map_err(|e| DataError::ParseError(format!("Failed to parse close '{}': {}", s, e)))
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Common formats (without timezone, assume UTC)
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y%m%d %H:%M:%S",
    ];

    for fmt in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    // Date-only formats map to midnight UTC
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            let naive = date.and_time(NaiveTime::MIN);
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    // Try Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(DataError::ParseError(format!(
        "Unable to parse timestamp: '{}'",
        s
    )))
}
