use crate::Indicator;

/// Exponential Moving Average (EMA).
///
/// Seeded with the simple mean of the first `period` inputs, then
/// `ema = (value - prev) * k + prev` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    len: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    /// Accumulates values for the initial SMA seed.
    seed_sum: f64,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            len: period,
            multiplier: 2.0 / (period as f64 + 1.0),
            current: None,
            count: 0,
            seed_sum: 0.0,
        }
    }
}

impl Indicator for Ema {
    fn next(&mut self, value: f64) -> Option<f64> {
        self.count += 1;

        match self.current {
            None => {
                // Accumulate for SMA seed
                self.seed_sum += value;
                if self.count >= self.len {
                    self.current = Some(self.seed_sum / self.len as f64);
                }
            }
            Some(prev) => {
                self.current = Some((value - prev) * self.multiplier + prev);
            }
        }

        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.seed_sum = 0.0;
    }

    fn period(&self) -> usize {
        self.len
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
