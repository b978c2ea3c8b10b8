use crate::crossover::{crosses_above, last_two_joint};
use screener_core::{AnalysisConfig, EmaCrossResult, EmaPair, IndicatorSeries};
use screener_indicators::ema::Ema;
use screener_indicators::fold_series;

/// Fast and slow EMA periods for the crossover check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaCrossParams {
    pub fast: usize,
    pub slow: usize,
}

impl Default for EmaCrossParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for EmaCrossParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            fast: config.ema_fast,
            slow: config.ema_slow,
        }
    }
}

/// Fast and slow EMAs aligned to `closes`.
///
/// # Panics
///
/// Panics on a zero period.
pub fn compute_emas(closes: &[f64], params: &EmaCrossParams) -> (IndicatorSeries, IndicatorSeries) {
    let fast = fold_series(&mut Ema::new(params.fast), closes);
    let slow = fold_series(&mut Ema::new(params.slow), closes);
    (
        IndicatorSeries::from_values(fast),
        IndicatorSeries::from_values(slow),
    )
}

/// The fast EMA crossed above the slow EMA between the last two joint points.
pub fn ema_cross_condition(fast_ema: &IndicatorSeries, slow_ema: &IndicatorSeries) -> bool {
    last_two_joint(fast_ema, slow_ema)
        .is_some_and(|(previous, latest)| crosses_above(previous, latest))
}

pub fn evaluate(closes: &[f64], params: &EmaCrossParams) -> EmaCrossResult {
    let (fast_ema, slow_ema) = compute_emas(closes, params);
    let condition_met = ema_cross_condition(&fast_ema, &slow_ema);
    let latest = last_two_joint(&fast_ema, &slow_ema)
        .map(|(_, (fast, slow))| EmaPair { fast, slow });
    EmaCrossResult {
        fast_ema,
        slow_ema,
        condition_met,
        latest,
    }
}
