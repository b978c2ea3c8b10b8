pub mod ema;
pub mod macd;
pub mod rsi;

/// Trait for streaming (incremental) indicators.
/// Feed one value at a time; the indicator maintains internal state.
pub trait Indicator: Send + Sync {
    /// Process the next value and return the indicator output (if ready).
    fn next(&mut self, value: f64) -> Option<f64>;

    /// Reset the indicator to its initial state.
    fn reset(&mut self);

    /// The minimum number of data points needed before the indicator produces output.
    fn period(&self) -> usize;

    /// Whether the indicator has enough data to produce output.
    fn is_ready(&self) -> bool;
}

/// Run `indicator` over `values` from a fresh state, one output per input.
pub fn fold_series<I: Indicator + ?Sized>(indicator: &mut I, values: &[f64]) -> Vec<Option<f64>> {
    indicator.reset();
    values.iter().map(|v| indicator.next(*v)).collect()
}
