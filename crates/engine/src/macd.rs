use crate::crossover::{crosses_above, last_two_joint};
use screener_core::{AnalysisConfig, IndicatorSeries, MacdResult, MacdSnapshot};
use screener_indicators::macd::Macd;

/// Fast, slow and signal EMA periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for MacdParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            fast: config.macd_fast,
            slow: config.macd_slow,
            signal: config.macd_signal,
        }
    }
}

/// The three MACD series, each aligned to the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd_line: IndicatorSeries,
    pub signal_line: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// MACD line from index `slow - 1`, signal and histogram from
/// `slow + signal - 2`.
///
/// Input shorter than `slow + signal` points leaves all three series
/// undefined.
///
/// # Panics
///
/// Panics on a zero period or when `fast >= slow`.
pub fn compute_macd(closes: &[f64], params: &MacdParams) -> MacdSeries {
    let len = closes.len();
    if len < params.slow + params.signal {
        return MacdSeries {
            macd_line: IndicatorSeries::undefined(len),
            signal_line: IndicatorSeries::undefined(len),
            histogram: IndicatorSeries::undefined(len),
        };
    }

    let mut macd = Macd::new(params.fast, params.slow, params.signal);

    let mut macd_line = Vec::with_capacity(len);
    let mut signal_line = Vec::with_capacity(len);
    let mut histogram = Vec::with_capacity(len);
    for close in closes {
        let step = macd.next_components(*close);
        macd_line.push(step.macd);
        signal_line.push(step.signal);
        histogram.push(step.histogram());
    }

    MacdSeries {
        macd_line: IndicatorSeries::from_values(macd_line),
        signal_line: IndicatorSeries::from_values(signal_line),
        histogram: IndicatorSeries::from_values(histogram),
    }
}

/// The latest two indices where MACD and signal are both defined, as
/// `(previous, latest)` snapshots.
fn last_two_snapshots(
    macd_line: &IndicatorSeries,
    signal_line: &IndicatorSeries,
) -> Option<(MacdSnapshot, MacdSnapshot)> {
    let snapshot = |(macd, signal): (f64, f64)| MacdSnapshot {
        macd,
        signal,
        histogram: macd - signal,
    };
    let (previous, latest) = last_two_joint(macd_line, signal_line)?;
    Some((snapshot(previous), snapshot(latest)))
}

/// MACD at or below its signal before, strictly above it now.
pub fn crossed_above(previous: &MacdSnapshot, latest: &MacdSnapshot) -> bool {
    crosses_above(
        (previous.macd, previous.signal),
        (latest.macd, latest.signal),
    )
}

/// MACD is rising, or it has just crossed above the signal line.
pub fn macd_condition(macd_line: &IndicatorSeries, signal_line: &IndicatorSeries) -> bool {
    match last_two_snapshots(macd_line, signal_line) {
        Some((previous, latest)) => latest.macd > previous.macd || crossed_above(&previous, &latest),
        None => false,
    }
}

pub fn evaluate(closes: &[f64], params: &MacdParams) -> MacdResult {
    let MacdSeries {
        macd_line,
        signal_line,
        histogram,
    } = compute_macd(closes, params);
    let condition_met = macd_condition(&macd_line, &signal_line);
    let latest = last_two_snapshots(&macd_line, &signal_line).map(|(_, latest)| latest);

    MacdResult {
        macd_line,
        signal_line,
        histogram,
        condition_met,
        latest,
    }
}
