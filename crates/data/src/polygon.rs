use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use screener_core::{DataError, Mode, PricePoint, PriceSource, Timeframe};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    #[serde(default)]
    results: Vec<AggregateBar>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// One aggregate bar; only the fields the screener reads.
#[derive(Debug, Deserialize)]
struct AggregateBar {
    /// Bar start, milliseconds since the Unix epoch.
    t: i64,
    c: f64,
}

struct CachedSeries {
    fetched_at: Instant,
    points: Vec<PricePoint>,
}

/// Polygon.io aggregates client.
///
/// Stocks are requested as weekly bars over the last year, options as daily
/// bars over the last 90 days. Responses are cached per ticker and mode.
pub struct PolygonClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    cache_ttl: Duration,
    cache: RwLock<HashMap<(String, Mode), CachedSeries>>,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DataError::ApiError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    /// Request the aggregates for `ticker`, bypassing the cache.
    pub async fn fetch(&self, ticker: &str, mode: Mode) -> Result<Vec<PricePoint>, DataError> {
        let ticker = ticker.trim().to_uppercase();
        let path = aggregates_path(&ticker, mode, Utc::now().date_naive());
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(ticker = %ticker, mode = %mode, path = %path, "Requesting Polygon aggregates");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "5000"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DataError::ApiError(format!("Error fetching data from Polygon.io: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataError::ApiError(format!("Failed to read Polygon.io response: {}", e)))?;

        if !status.is_success() {
            return Err(DataError::ApiError(format!(
                "Polygon.io returned {} for {}: {}",
                status, ticker, body
            )));
        }

        parse_aggregates(&ticker, mode, &body)
    }

    /// Cache `points` under `key`, dropping entries older than the TTL.
    async fn store(&self, key: (String, Mode), points: Vec<PricePoint>) {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, cached| cached.fetched_at.elapsed() < self.cache_ttl);
        if cache.len() < before {
            tracing::debug!(evicted = before - cache.len(), "Evicted stale Polygon cache entries");
        }
        cache.insert(
            key,
            CachedSeries {
                fetched_at: Instant::now(),
                points,
            },
        );
    }
}

#[async_trait]
impl PriceSource for PolygonClient {
    async fn load_points(&self, symbol: &str, mode: Mode) -> Result<Vec<PricePoint>, DataError> {
        let key = (symbol.trim().to_uppercase(), mode);

        if let Some(cached) = self.cache.read().await.get(&key) {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                tracing::debug!(ticker = %key.0, mode = %mode, "Polygon cache hit");
                return Ok(cached.points.clone());
            }
        }

        let points = self.fetch(&key.0, mode).await?;
        self.store(key, points.clone()).await;
        Ok(points)
    }

    fn name(&self) -> &str {
        "polygon"
    }
}

/// `/v2/aggs/ticker/{T}/range/1/{week|day}/{from}/{to}` covering the mode's lookback.
pub fn aggregates_path(ticker: &str, mode: Mode, today: NaiveDate) -> String {
    let span = match mode.timeframe() {
        Timeframe::Weekly => "week",
        Timeframe::Daily => "day",
    };
    let from = today - ChronoDuration::days(mode.lookback_days());
    format!(
        "/v2/aggs/ticker/{}/range/1/{}/{}/{}",
        ticker,
        span,
        from.format("%Y-%m-%d"),
        today.format("%Y-%m-%d")
    )
}

fn parse_aggregates(ticker: &str, mode: Mode, body: &str) -> Result<Vec<PricePoint>, DataError> {
    let response: AggregatesResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ParseError(format!("Invalid Polygon.io response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(DataError::ApiError(error));
    }

    if response.results.is_empty() {
        let timeframe = match mode.timeframe() {
            Timeframe::Weekly => "weekly",
            Timeframe::Daily => "daily",
        };
        tracing::warn!(ticker = %ticker, status = ?response.status, "Polygon.io returned no bars");
        return Err(DataError::NotFound(format!("No {} data found for {}.", timeframe, ticker)));
    }

    response
        .results
        .into_iter()
        .map(|bar| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(bar.t).ok_or_else(|| {
                DataError::ParseError(format!("Bar timestamp out of range: {}", bar.t))
            })?;
            Ok(PricePoint::new(timestamp, bar.c))
        })
        .collect()
}
