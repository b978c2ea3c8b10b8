use crate::traits::DataError;
use chrono::{DateTime, Utc};

/// Malformed input rejected before any indicator is computed.
///
/// These are never repaired: the caller gets the error and no partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("timestamp at index {index} ({current}) is not after the previous one ({previous})")]
    UnorderedTimestamps {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
    #[error("close at index {index} must be positive, got {close}")]
    NonPositivePrice { index: usize, close: f64 },
    #[error("close at index {index} is not a finite number")]
    NonFinitePrice { index: usize },
    #[error("{name} must be greater than zero")]
    ZeroPeriod { name: &'static str },
    #[error("macd_fast ({fast}) must be less than macd_slow ({slow})")]
    MacdPeriodOrder { fast: usize, slow: usize },
    #[error("ema_fast ({fast}) must be less than ema_slow ({slow})")]
    EmaPeriodOrder { fast: usize, slow: usize },
    #[error("RSI band [{low}, {high}] must satisfy 0 <= low <= high <= 100")]
    InvalidRsiBand { low: f64, high: f64 },
}

/// Errors surfaced by an analysis request.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Data(#[from] DataError),
}
