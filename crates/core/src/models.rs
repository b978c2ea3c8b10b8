use crate::error::InvalidInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Sampling Mode
// ---------------------------------------------------------------------------

/// Bar size of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
}

/// How a ticker is sampled before analysis.
///
/// Stocks are read as weekly bars over one year, options as daily bars over
/// 90 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Stock,
    #[serde(rename = "option")]
    OptionContract,
}

impl Mode {
    pub fn timeframe(&self) -> Timeframe {
        match self {
            Mode::Stock => Timeframe::Weekly,
            Mode::OptionContract => Timeframe::Daily,
        }
    }

    /// Calendar days of history requested for this mode.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Mode::Stock => 365,
            Mode::OptionContract => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Stock => "stock",
            Mode::OptionContract => "option",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(Mode::Stock),
            "option" => Ok(Mode::OptionContract),
            other => Err(format!("unknown mode '{other}', expected 'stock' or 'option'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Price Data
// ---------------------------------------------------------------------------

/// A single closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Closing prices in strictly increasing timestamp order.
///
/// Construction validates ordering and prices; an empty series is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, InvalidInput> {
        for (index, point) in points.iter().enumerate() {
            if !point.close.is_finite() {
                return Err(InvalidInput::NonFinitePrice { index });
            }
            if point.close <= 0.0 {
                return Err(InvalidInput::NonPositivePrice {
                    index,
                    close: point.close,
                });
            }
            if index > 0 {
                let previous = points[index - 1].timestamp;
                if point.timestamp <= previous {
                    return Err(InvalidInput::UnorderedTimestamps {
                        index,
                        previous,
                        current: point.timestamp,
                    });
                }
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = InvalidInput;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

// ---------------------------------------------------------------------------
// Indicator Output
// ---------------------------------------------------------------------------

/// One value per input point; `None` marks the warm-up region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    /// A series of `len` positions with no defined value.
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn first_defined_index(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    pub fn last_defined(&self) -> Option<f64> {
        self.0.iter().rev().find_map(|v| *v)
    }

    /// The last two defined values as `(previous, latest)`, skipping any
    /// undefined positions between them.
    pub fn last_two_defined(&self) -> Option<(f64, f64)> {
        let mut defined = self.0.iter().rev().filter_map(|v| *v);
        let latest = defined.next()?;
        let previous = defined.next()?;
        Some((previous, latest))
    }
}

// ---------------------------------------------------------------------------
// Analysis Results
// ---------------------------------------------------------------------------

/// RSI series plus the "in band and rising" condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiResult {
    pub series: IndicatorSeries,
    pub condition_met: bool,
    /// Most recent defined RSI value.
    pub latest: Option<f64>,
}

impl RsiResult {
    pub fn summary(&self, band_low: f64, band_high: f64) -> String {
        match self.latest {
            None => "Not enough RSI data".to_string(),
            Some(rsi) if self.condition_met => format!(
                "RSI is between {band_low:.0}-{band_high:.0} and rising ({rsi:.2})"
            ),
            Some(rsi) => format!("RSI condition not met ({rsi:.2})"),
        }
    }
}

/// MACD components at a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line, signal line and histogram plus the "rising or crossing" condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd_line: IndicatorSeries,
    pub signal_line: IndicatorSeries,
    pub histogram: IndicatorSeries,
    pub condition_met: bool,
    /// Components at the latest index where all three are defined.
    pub latest: Option<MacdSnapshot>,
}

impl MacdResult {
    pub fn summary(&self) -> String {
        match self.latest {
            None => "Not enough MACD data".to_string(),
            Some(s) if self.condition_met => format!(
                "MACD is rising or has crossed above the signal line (MACD {:.4}, signal {:.4})",
                s.macd, s.signal
            ),
            Some(s) => format!(
                "MACD condition not met (MACD {:.4}, signal {:.4})",
                s.macd, s.signal
            ),
        }
    }
}

/// Fast and slow EMA at a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaPair {
    pub fast: f64,
    pub slow: f64,
}

/// Fast/slow EMA pair plus the "fast just crossed above slow" condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaCrossResult {
    pub fast_ema: IndicatorSeries,
    pub slow_ema: IndicatorSeries,
    pub condition_met: bool,
    pub latest: Option<EmaPair>,
}

impl EmaCrossResult {
    pub fn summary(&self, fast_period: usize, slow_period: usize) -> String {
        match self.latest {
            None => "Not enough data for EMA calculation".to_string(),
            Some(_) if self.condition_met => {
                format!("EMA {fast_period} just crossed above EMA {slow_period}")
            }
            Some(pair) => format!(
                "No recent bullish EMA crossover (EMA {fast_period} {:.2}, EMA {slow_period} {:.2})",
                pair.fast, pair.slow
            ),
        }
    }
}

/// Everything the core hands back for one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rsi: RsiResult,
    pub macd: MacdResult,
    /// Present when the EMA crossover check is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_crossover: Option<EmaCrossResult>,
}

impl AnalysisResult {
    /// True when any evaluated condition holds; a ticker failing all of them
    /// is screened out.
    pub fn any_condition_met(&self) -> bool {
        self.rsi.condition_met
            || self.macd.condition_met
            || self.ema_crossover.as_ref().is_some_and(|ema| ema.condition_met)
    }
}
