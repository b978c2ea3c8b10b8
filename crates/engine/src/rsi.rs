use screener_core::{AnalysisConfig, IndicatorSeries, RsiResult};
use screener_indicators::rsi::Rsi;
use screener_indicators::fold_series;

/// RSI period and the inclusive band the latest value must sit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub band_low: f64,
    pub band_high: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for RsiParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            period: config.rsi_period,
            band_low: config.rsi_band_low,
            band_high: config.rsi_band_high,
        }
    }
}

/// Wilder RSI aligned to `closes`; the first `period` positions are undefined.
///
/// # Panics
///
/// Panics if `period` is zero. [`AnalysisConfig::validate`] rejects that first.
pub fn compute_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut rsi = Rsi::new(period);
    IndicatorSeries::from_values(fold_series(&mut rsi, closes))
}

/// Latest defined RSI is inside the band and above the previous defined one.
pub fn rsi_condition(series: &IndicatorSeries, band_low: f64, band_high: f64) -> bool {
    match series.last_two_defined() {
        Some((previous, latest)) => (band_low..=band_high).contains(&latest) && latest > previous,
        None => false,
    }
}

pub fn evaluate(closes: &[f64], params: &RsiParams) -> RsiResult {
    let series = compute_rsi(closes, params.period);
    let condition_met = rsi_condition(&series, params.band_low, params.band_high);
    let latest = series.last_defined();
    RsiResult {
        series,
        condition_met,
        latest,
    }
}
