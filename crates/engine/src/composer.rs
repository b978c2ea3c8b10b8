use crate::ema_cross::{self, EmaCrossParams};
use crate::macd::{self, MacdParams};
use crate::rsi::{self, RsiParams};
use screener_core::{
    AnalysisConfig, AnalysisError, AnalysisResult, InvalidInput, MacdResult, Mode, PricePoint,
    PriceSeries, PriceSource, RsiResult,
};

/// Merge independently computed engine outputs into one result.
pub fn compose(rsi: RsiResult, macd: MacdResult) -> AnalysisResult {
    AnalysisResult {
        rsi,
        macd,
        ema_crossover: None,
    }
}

/// Run both engines over `series`.
///
/// Too little data is not an error: the affected series stay undefined and
/// their conditions are false. Only an invalid `config` is rejected.
pub fn analyze(
    series: &PriceSeries,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, InvalidInput> {
    config.validate()?;

    let closes = series.closes();
    let rsi = rsi::evaluate(&closes, &RsiParams::from(config));
    let macd = macd::evaluate(&closes, &MacdParams::from(config));

    let mut result = compose(rsi, macd);
    if config.ema_crossover {
        result.ema_crossover = Some(ema_cross::evaluate(&closes, &EmaCrossParams::from(config)));
    }

    tracing::debug!(
        points = closes.len(),
        rsi_latest = ?result.rsi.latest,
        rsi_condition = result.rsi.condition_met,
        macd_condition = result.macd.condition_met,
        ema_condition = ?result.ema_crossover.as_ref().map(|ema| ema.condition_met),
        "Analysis complete"
    );

    Ok(result)
}

/// Validate raw points, then analyze them.
pub fn analyze_points(
    points: Vec<PricePoint>,
    config: &AnalysisConfig,
) -> Result<(PriceSeries, AnalysisResult), InvalidInput> {
    let series = PriceSeries::new(points)?;
    let result = analyze(&series, config)?;
    Ok((series, result))
}

/// Load `symbol` from `source` for `mode` and analyze it.
pub async fn analyze_symbol(
    source: &dyn PriceSource,
    symbol: &str,
    mode: Mode,
    config: &AnalysisConfig,
) -> Result<(PriceSeries, AnalysisResult), AnalysisError> {
    // Reject a bad config before spending a request on the loader.
    config.validate()?;

    let points = source.load_points(symbol, mode).await?;
    tracing::info!(
        symbol = %symbol,
        mode = %mode,
        source = source.name(),
        points = points.len(),
        "Loaded price series"
    );

    Ok(analyze_points(points, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use screener_core::DataError;

    struct FixedSource {
        points: Vec<PricePoint>,
    }

    #[async_trait]
    impl PriceSource for FixedSource {
        async fn load_points(
            &self,
            symbol: &str,
            _mode: Mode,
        ) -> Result<Vec<PricePoint>, DataError> {
            if symbol == "MISSING" {
                return Err(DataError::NotFound(symbol.to_string()));
            }
            Ok(self.points.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn weekly(closes: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(start + Duration::weeks(i as i64), *c))
            .collect()
    }

    #[test]
    fn test_compose_keeps_inputs() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let rsi = rsi::evaluate(&closes, &RsiParams::default());
        let macd = macd::evaluate(&closes, &MacdParams::default());
        let result = compose(rsi.clone(), macd.clone());
        assert_eq!(result.rsi, rsi);
        assert_eq!(result.macd, macd);
        assert_eq!(result.ema_crossover, None);
    }

    #[test]
    fn test_ema_crossover_runs_only_when_enabled() {
        let closes: Vec<f64> = (0..40).map(|i| 10.0 + i as f64).collect();
        let (_, plain) = analyze_points(weekly(&closes), &AnalysisConfig::default()).unwrap();
        assert!(plain.ema_crossover.is_none());

        let config = AnalysisConfig {
            ema_crossover: true,
            ..AnalysisConfig::default()
        };
        let (_, checked) = analyze_points(weekly(&closes), &config).unwrap();
        let ema = checked.ema_crossover.unwrap();
        assert_eq!(ema.fast_ema.len(), 40);
        assert_eq!(ema.slow_ema.first_defined_index(), Some(20));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalysisConfig {
            rsi_period: 0,
            ..AnalysisConfig::default()
        };
        let err = analyze(&PriceSeries::default(), &config).unwrap_err();
        assert_eq!(err, InvalidInput::ZeroPeriod { name: "rsi_period" });
    }

    #[test]
    fn test_all_series_match_input_length() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 / 3.0).cos() * 5.0).collect();
        let (series, result) = analyze_points(weekly(&closes), &AnalysisConfig::default()).unwrap();
        assert_eq!(result.rsi.series.len(), series.len());
        assert_eq!(result.macd.macd_line.len(), series.len());
        assert_eq!(result.macd.signal_line.len(), series.len());
        assert_eq!(result.macd.histogram.len(), series.len());
    }

    #[tokio::test]
    async fn test_analyze_symbol_loads_and_analyzes() {
        let closes: Vec<f64> = (0..52).map(|i| 50.0 * 1.01_f64.powi(i)).collect();
        let source = FixedSource {
            points: weekly(&closes),
        };
        let (series, result) =
            analyze_symbol(&source, "ACME", Mode::Stock, &AnalysisConfig::default())
                .await
                .unwrap();
        assert_eq!(series.len(), 52);
        assert!(result.macd.condition_met);
    }

    #[tokio::test]
    async fn test_analyze_symbol_surfaces_loader_errors() {
        let source = FixedSource { points: Vec::new() };
        let err = analyze_symbol(&source, "MISSING", Mode::Stock, &AnalysisConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Data(DataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_analyze_symbol_rejects_unordered_points() {
        let mut points = weekly(&[10.0, 11.0, 12.0]);
        points.swap(0, 2);
        let source = FixedSource { points };
        let err = analyze_symbol(&source, "ACME", Mode::Stock, &AnalysisConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidInput(InvalidInput::UnorderedTimestamps { index: 1, .. })
        ));
    }
}
