use crate::models::{Mode, PricePoint};
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Price Source Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while loading prices.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("API error: {0}")]
    ApiError(String),
}

/// Supplies closing prices for a symbol, sampled according to `mode`.
///
/// Points come back in source order. Callers wrap them in a
/// [`PriceSeries`](crate::PriceSeries), which rejects unordered input.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Load the closes for `symbol` covering the mode's lookback window.
    async fn load_points(&self, symbol: &str, mode: Mode) -> Result<Vec<PricePoint>, DataError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
