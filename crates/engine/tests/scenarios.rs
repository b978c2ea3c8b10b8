//! End-to-end scenarios through `analyze`, with hand-checked golden values.

mod common;

use common::{approx_eq, daily_points, EPSILON};
use screener_core::{AnalysisConfig, InvalidInput, PriceSeries};
use screener_engine::macd::{compute_macd, MacdParams};
use screener_engine::rsi::compute_rsi;
use screener_engine::{analyze, analyze_points};
use screener_indicators::ema::Ema;
use screener_indicators::fold_series;

const WILDER_FIXTURE: [f64; 15] = [
    44.0, 44.25, 44.5, 43.75, 44.5, 44.75, 45.5, 45.25, 45.0, 44.75, 44.5, 44.25, 43.75, 44.75,
    45.1,
];

#[test]
fn golden_rsi_single_value_at_last_index() {
    let series = compute_rsi(&WILDER_FIXTURE, 14);
    assert_eq!(series.len(), 15);
    assert_eq!(series.defined_count(), 1);
    assert_eq!(series.first_defined_index(), Some(14));

    // Gains sum to 3.6 and losses to 2.5 over the 14 changes:
    // RS = (3.6 / 14) / (2.5 / 14) = 1.44, RSI = 100 - 100 / 2.44.
    let value = series.get(14).unwrap();
    assert!(approx_eq(value, 59.016393442622956, EPSILON), "got {value}");
    assert!(approx_eq(value, 100.0 - 100.0 / 2.44, EPSILON));
}

#[test]
fn golden_rsi_condition_needs_two_values() {
    let (_, result) = analyze_points(daily_points(&WILDER_FIXTURE), &AnalysisConfig::default())
        .unwrap();
    assert!(!result.rsi.condition_met);
    assert!(approx_eq(result.rsi.latest.unwrap(), 59.016393442622956, EPSILON));
}

#[test]
fn empty_series_is_well_formed() {
    let result = analyze(&PriceSeries::default(), &AnalysisConfig::default()).unwrap();
    assert!(result.rsi.series.is_empty());
    assert!(result.macd.macd_line.is_empty());
    assert!(result.macd.signal_line.is_empty());
    assert!(result.macd.histogram.is_empty());
    assert!(!result.rsi.condition_met);
    assert!(!result.macd.condition_met);
    assert_eq!(result.rsi.latest, None);
    assert_eq!(result.macd.latest, None);
}

#[test]
fn single_point_series_is_all_undefined() {
    let (_, result) = analyze_points(daily_points(&[101.5]), &AnalysisConfig::default()).unwrap();
    assert_eq!(result.rsi.series.values(), &[None]);
    assert_eq!(result.macd.macd_line.values(), &[None]);
    assert!(!result.rsi.condition_met);
    assert!(!result.macd.condition_met);
}

#[test]
fn constant_prices_saturate_rsi_at_100() {
    let closes = vec![25.0; 30];
    let series = compute_rsi(&closes, 14);
    for value in series.iter().skip(14) {
        assert_eq!(value, Some(100.0));
    }
}

#[test]
fn increasing_series_has_positive_rising_macd() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
    let (_, result) = analyze_points(daily_points(&closes), &AnalysisConfig::default()).unwrap();

    let (previous, latest) = result.macd.macd_line.last_two_defined().unwrap();
    assert!(latest > 0.0);
    assert!(latest > previous);
    assert!(result.macd.condition_met);
    let snapshot = result.macd.latest.unwrap();
    assert!(approx_eq(snapshot.macd, 8.811342232010418, 1e-6));
    assert!(approx_eq(snapshot.signal, 8.562909528555506, 1e-6));
}

#[test]
fn linear_ramp_has_flat_macd() {
    // With SMA-seeded EMAs a constant slope gives a constant lag in each EMA,
    // so MACD settles at slope * (slow - fast) / 2 and never rises.
    let closes: Vec<f64> = (1..=40).map(f64::from).collect();
    let (_, result) = analyze_points(daily_points(&closes), &AnalysisConfig::default()).unwrap();

    let (previous, latest) = result.macd.macd_line.last_two_defined().unwrap();
    assert!(approx_eq(previous, 7.0, EPSILON));
    assert!(approx_eq(latest, 7.0, EPSILON));
    assert!(!result.macd.condition_met);
}

#[test]
fn macd_line_is_difference_of_emas() {
    let closes: Vec<f64> = (0..60)
        .map(|i| 40.0 + (i as f64 / 4.0).sin() * 3.0 + i as f64 * 0.1)
        .collect();
    let params = MacdParams::default();
    let out = compute_macd(&closes, &params);
    let fast = fold_series(&mut Ema::new(params.fast), &closes);
    let slow = fold_series(&mut Ema::new(params.slow), &closes);

    for i in 0..closes.len() {
        match (fast[i], slow[i]) {
            (Some(f), Some(s)) => {
                assert!(approx_eq(out.macd_line.get(i).unwrap(), f - s, EPSILON))
            }
            _ => assert_eq!(out.macd_line.get(i), None),
        }
        if let (Some(m), Some(s)) = (out.macd_line.get(i), out.signal_line.get(i)) {
            assert!(approx_eq(out.histogram.get(i).unwrap(), m - s, EPSILON));
        }
    }
}

#[test]
fn signal_line_is_ema_of_defined_macd() {
    let closes: Vec<f64> = (0..45).map(|i| 30.0 + ((i * 7) % 11) as f64).collect();
    let params = MacdParams::default();
    let out = compute_macd(&closes, &params);

    let defined: Vec<f64> = out.macd_line.iter().flatten().collect();
    let signal = fold_series(&mut Ema::new(params.signal), &defined);
    let offset = params.slow - 1;
    for (j, expected) in signal.iter().enumerate() {
        assert_eq!(out.signal_line.get(offset + j), *expected);
    }
}

#[test]
fn daily_swing_preset_warms_up_sooner() {
    let closes: Vec<f64> = (0..35).map(|i| 10.0 + i as f64 * 0.2).collect();
    let (_, standard) = analyze_points(daily_points(&closes), &AnalysisConfig::default()).unwrap();
    let (_, swing) = analyze_points(daily_points(&closes), &AnalysisConfig::daily_swing()).unwrap();
    assert_eq!(standard.macd.signal_line.first_defined_index(), Some(33));
    assert_eq!(swing.macd.signal_line.first_defined_index(), Some(28));
}

#[test]
fn out_of_order_timestamps_are_rejected() {
    let mut points = daily_points(&[10.0, 10.5, 11.0, 10.8]);
    points.swap(1, 2);
    let err = analyze_points(points, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, InvalidInput::UnorderedTimestamps { index: 2, .. }));
}

#[test]
fn non_positive_price_is_rejected() {
    let err = analyze_points(daily_points(&[10.0, -1.0]), &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err, InvalidInput::NonPositivePrice { index: 1, close: -1.0 });
}

#[test]
fn result_serializes_warmup_as_null() {
    let (_, result) = analyze_points(daily_points(&WILDER_FIXTURE), &AnalysisConfig::default())
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let rsi = json["rsi"]["series"].as_array().unwrap();
    assert_eq!(rsi.len(), 15);
    assert!(rsi[0].is_null());
    assert!(rsi[14].is_number());
    assert_eq!(json["macd"]["condition_met"], false);
}
