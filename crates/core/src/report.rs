use crate::config::AnalysisConfig;
use crate::models::{AnalysisResult, EmaPair, IndicatorSeries, MacdSnapshot, Mode, PriceSeries};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A timestamped indicator value; `value` is `null` during warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Pair each indicator value with the timestamp of its price point.
pub fn timestamped(prices: &PriceSeries, series: &IndicatorSeries) -> Vec<SeriesPoint> {
    prices
        .points()
        .iter()
        .zip(series.iter())
        .map(|(point, value)| SeriesPoint {
            timestamp: point.timestamp,
            value,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct RsiReport {
    pub points: Vec<SeriesPoint>,
    pub condition_met: bool,
    pub latest: Option<f64>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MacdReport {
    pub macd_line: Vec<SeriesPoint>,
    pub signal_line: Vec<SeriesPoint>,
    pub histogram: Vec<SeriesPoint>,
    pub condition_met: bool,
    pub latest: Option<MacdSnapshot>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmaCrossReport {
    pub fast_ema: Vec<SeriesPoint>,
    pub slow_ema: Vec<SeriesPoint>,
    pub condition_met: bool,
    pub latest: Option<EmaPair>,
    pub summary: String,
}

/// Render-ready view of an [`AnalysisResult`], shared by the CLI and the API.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    pub points: usize,
    pub last_close: Option<f64>,
    pub config: AnalysisConfig,
    /// At least one condition passed.
    pub any_condition_met: bool,
    pub rsi: RsiReport,
    pub macd: MacdReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_crossover: Option<EmaCrossReport>,
}

impl AnalysisReport {
    pub fn new(prices: &PriceSeries, result: &AnalysisResult, config: &AnalysisConfig) -> Self {
        Self {
            symbol: None,
            mode: None,
            points: prices.len(),
            last_close: prices.last().map(|p| p.close),
            config: config.clone(),
            any_condition_met: result.any_condition_met(),
            rsi: RsiReport {
                points: timestamped(prices, &result.rsi.series),
                condition_met: result.rsi.condition_met,
                latest: result.rsi.latest,
                summary: result.rsi.summary(config.rsi_band_low, config.rsi_band_high),
            },
            macd: MacdReport {
                macd_line: timestamped(prices, &result.macd.macd_line),
                signal_line: timestamped(prices, &result.macd.signal_line),
                histogram: timestamped(prices, &result.macd.histogram),
                condition_met: result.macd.condition_met,
                latest: result.macd.latest,
                summary: result.macd.summary(),
            },
            ema_crossover: result.ema_crossover.as_ref().map(|ema| EmaCrossReport {
                fast_ema: timestamped(prices, &ema.fast_ema),
                slow_ema: timestamped(prices, &ema.slow_ema),
                condition_met: ema.condition_met,
                latest: ema.latest,
                summary: ema.summary(config.ema_fast, config.ema_slow),
            }),
        }
    }

    pub fn with_symbol(mut self, symbol: &str, mode: Mode) -> Self {
        self.symbol = Some(symbol.to_string());
        self.mode = Some(mode);
        self
    }
}
