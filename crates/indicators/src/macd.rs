use crate::ema::Ema;
use crate::Indicator;

/// MACD (Moving Average Convergence Divergence).
///
/// Composed of three EMAs:
/// - Fast EMA (default 12)
/// - Slow EMA (default 26)
/// - Signal EMA (default 9), fed only with defined MACD values
///
/// `next` returns the MACD line; `next_components` returns it with the signal.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: Ema,
    slow_ema: Ema,
    signal_ema: Ema,
    macd_line: Option<f64>,
    signal_line: Option<f64>,
}

/// Per-step components; the signal warms up later than the MACD line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacdComponents {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
}

impl MacdComponents {
    pub fn histogram(&self) -> Option<f64> {
        Some(self.macd? - self.signal?)
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period < slow_period, "Fast period must be less than slow period");
        Self {
            fast_ema: Ema::new(fast_period),
            slow_ema: Ema::new(slow_period),
            signal_ema: Ema::new(signal_period),
            macd_line: None,
            signal_line: None,
        }
    }

    /// Process next value and return whichever components are defined so far.
    pub fn next_components(&mut self, value: f64) -> MacdComponents {
        let fast = self.fast_ema.next(value);
        let slow = self.slow_ema.next(value);

        if let (Some(f), Some(s)) = (fast, slow) {
            let macd = f - s;
            self.macd_line = Some(macd);
            self.signal_line = self.signal_ema.next(macd);
        }

        MacdComponents {
            macd: self.macd_line,
            signal: self.signal_line,
        }
    }
}

impl Indicator for Macd {
    fn next(&mut self, value: f64) -> Option<f64> {
        self.next_components(value).macd
    }

    fn reset(&mut self) {
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.signal_ema.reset();
        self.macd_line = None;
        self.signal_line = None;
    }

    fn period(&self) -> usize {
        self.slow_ema.period()
    }

    fn is_ready(&self) -> bool {
        self.signal_line.is_some()
    }
}
