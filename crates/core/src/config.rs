use crate::error::InvalidInput;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while reading or writing an [`AnalysisConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] InvalidInput),
}

/// Indicator periods and the RSI target band.
///
/// Every field is optional in a config file; missing fields take the
/// standard indicator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Inclusive lower bound of the RSI band.
    pub rsi_band_low: f64,
    /// Inclusive upper bound of the RSI band.
    pub rsi_band_high: f64,
    /// Also check for a fast EMA crossing above the slow EMA.
    pub ema_crossover: bool,
    pub ema_fast: usize,
    pub ema_slow: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_band_low: 30.0,
            rsi_band_high: 60.0,
            ema_crossover: false,
            ema_fast: 8,
            ema_slow: 21,
        }
    }
}

impl AnalysisConfig {
    /// Faster MACD (8, 21, 9) for daily bars.
    pub fn daily_swing() -> Self {
        Self {
            macd_fast: 8,
            macd_slow: 21,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        for (name, value) in [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
        ] {
            if value == 0 {
                return Err(InvalidInput::ZeroPeriod { name });
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(InvalidInput::MacdPeriodOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.ema_fast >= self.ema_slow {
            return Err(InvalidInput::EmaPeriodOrder {
                fast: self.ema_fast,
                slow: self.ema_slow,
            });
        }
        let (low, high) = (self.rsi_band_low, self.rsi_band_high);
        // NaN bounds fail every comparison, so they land here too.
        if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low > high {
            return Err(InvalidInput::InvalidRsiBand { low, high });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded analysis config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
