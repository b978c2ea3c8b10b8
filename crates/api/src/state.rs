use screener_core::{AnalysisConfig, PriceSource};
use std::sync::Arc;

/// Shared application state accessible by all route handlers.
pub struct AppState {
    /// Loader behind `GET /api/analyze/{symbol}`; `None` serves only posted series.
    pub source: Option<Arc<dyn PriceSource>>,
    pub config: AnalysisConfig,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            source: None,
            config,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.source = Some(source);
        self
    }
}
