//! Shared helpers for the engine integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use screener_core::PricePoint;

/// Tolerance for values that went through several smoothing passes.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-9;

#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

/// Daily points starting 2024-01-02, one per close.
#[allow(dead_code)]
pub fn daily_points(closes: &[f64]) -> Vec<PricePoint> {
    let start: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PricePoint::new(start + Duration::days(i as i64), *close))
        .collect()
}
