//! RSI and MACD engines, the optional EMA crossover check, and the composer
//! that runs them over one price series.
//!
//! Both engines are pure functions of the same closes and keep their
//! accumulators local to a single call.

pub mod composer;
pub mod crossover;
pub mod ema_cross;
pub mod macd;
pub mod rsi;

pub use composer::{analyze, analyze_points, analyze_symbol, compose};
pub use ema_cross::EmaCrossParams;
pub use macd::{MacdParams, MacdSeries};
pub use rsi::RsiParams;
