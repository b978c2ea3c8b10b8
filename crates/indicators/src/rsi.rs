use crate::Indicator;

/// Relative Strength Index (RSI).
/// Uses Wilder's smoothing for average gain/loss.
#[derive(Debug, Clone)]
pub struct Rsi {
    len: usize,
    prev_value: Option<f64>,
    gain_sum: f64,
    loss_sum: f64,
    averages: Option<(f64, f64)>,
    count: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            len: period,
            prev_value: None,
            gain_sum: 0.0,
            loss_sum: 0.0,
            averages: None,
            count: 0,
        }
    }

    fn value(&self) -> Option<f64> {
        self.averages.map(|(avg_gain, avg_loss)| {
            if avg_loss == 0.0 {
                100.0
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - 100.0 / (1.0 + rs)
            }
        })
    }
}

impl Indicator for Rsi {
    fn next(&mut self, value: f64) -> Option<f64> {
        if let Some(prev) = self.prev_value {
            let change = value - prev;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);

            self.count += 1;

            match self.averages {
                None => {
                    // Accumulate initial period
                    self.gain_sum += gain;
                    self.loss_sum += loss;

                    if self.count >= self.len {
                        let period = self.len as f64;
                        self.averages = Some((self.gain_sum / period, self.loss_sum / period));
                    }
                }
                Some((avg_gain, avg_loss)) => {
                    // Wilder's smoothing
                    let period = self.len as f64;
                    self.averages = Some((
                        (avg_gain * (period - 1.0) + gain) / period,
                        (avg_loss * (period - 1.0) + loss) / period,
                    ));
                }
            }
        }

        self.prev_value = Some(value);
        self.value()
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.gain_sum = 0.0;
        self.loss_sum = 0.0;
        self.averages = None;
        self.count = 0;
    }

    fn period(&self) -> usize {
        self.len + 1 // need one extra data point for the first change
    }

    fn is_ready(&self) -> bool {
        self.averages.is_some()
    }
}
