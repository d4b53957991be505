//! Property-based tests for the ensemble pipeline.
//!
//! These check invariants that hold for any qualifying series or insight
//! combination, using generated daily series.

use chrono::NaiveDate;
use climate_forecast::config::EnsembleConfig;
use climate_forecast::metrics::evaluate;
use climate_forecast::{
    ConfidenceScorer, EnsembleForecaster, EnsembleWeights, InsightSignal, ObservationSeries,
    TrendDirection,
};
use forecast_math::OutlierFilter;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn make_series(values: &[f64]) -> ObservationSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    ObservationSeries::from_values(start, "T2M", values).unwrap()
}

/// Strategy for generating daily readings of plausible magnitude.
fn values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| prop::collection::vec(-40.0..60.0_f64, len))
}

fn trend_strategy() -> impl Strategy<Value = TrendDirection> {
    prop_oneof![
        Just(TrendDirection::Unspecified),
        Just(TrendDirection::Stable),
        Just(TrendDirection::Up),
        Just(TrendDirection::Down),
    ]
}

fn signal_strategy() -> impl Strategy<Value = InsightSignal> {
    (trend_strategy(), any::<bool>(), 0.0..=1.0_f64, 0.0..=1.0_f64).prop_map(
        |(trend_direction, seasonality, volatility, confidence)| InsightSignal {
            trend_direction,
            seasonality,
            volatility,
            confidence,
        },
    )
}

/// Noisy warming series with a fixed seed.
fn noisy_series(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.5).unwrap();
    (0..len)
        .map(|i| 15.0 + 0.1 * i as f64 + noise.sample(&mut rng))
        .collect()
}

proptest! {
    #[test]
    fn weights_always_sum_to_one(signal in signal_strategy()) {
        let weights = EnsembleWeights::for_insight(&EnsembleConfig::default(), &signal);

        prop_assert!((weights.sum() - 1.0).abs() < 1e-9);
        prop_assert!(weights.arima >= 0.0);
        prop_assert!(weights.seasonal >= 0.0);
        prop_assert!(weights.moving_average >= 0.0);
    }

    #[test]
    fn confidence_never_increases_with_step(
        values in values_strategy(14, 60),
        signal in signal_strategy(),
        horizon in 1usize..30
    ) {
        let scores = ConfidenceScorer::default().scores(&values, &signal, horizon);

        prop_assert_eq!(scores.len(), horizon);
        for pair in scores.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
        for score in &scores {
            prop_assert!(*score >= 0.4);
        }
    }

    #[test]
    fn forecast_has_requested_cardinality(
        values in values_strategy(14, 40),
        horizon in 1usize..15
    ) {
        let series = make_series(&values);
        let last = series.last_date().unwrap();
        let points = EnsembleForecaster::with_defaults()
            .unwrap()
            .forecast(&series, "T2M", horizon, "");

        prop_assert_eq!(points.len(), horizon);
        for (i, point) in points.iter().enumerate() {
            prop_assert_eq!(point.date, last + chrono::Days::new(i as u64 + 1));
        }
        for pair in points.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn short_series_never_forecast(
        values in values_strategy(0, 14),
        horizon in 1usize..10
    ) {
        let series = make_series(&values);
        let points = EnsembleForecaster::with_defaults()
            .unwrap()
            .forecast(&series, "T2M", horizon, "trend upward, expect a weekly cycle");
        prop_assert!(points.is_empty());
    }

    #[test]
    fn constant_series_forecasts_the_constant(
        level in -30.0..45.0_f64,
        len in 14usize..40,
        horizon in 1usize..10
    ) {
        let series = make_series(&vec![level; len]);
        let points = EnsembleForecaster::with_defaults()
            .unwrap()
            .forecast(&series, "T2M", horizon, "");

        prop_assert_eq!(points.len(), horizon);
        for point in &points {
            // Output is rounded to three decimals.
            prop_assert!((point.value - level).abs() <= 5e-4 + 1e-9);
        }
    }

    #[test]
    fn cleaning_preserves_length_and_inliers(values in values_strategy(4, 50)) {
        let filter = OutlierFilter::default();
        let report = filter.detect(&values).unwrap();
        let cleaned = report.apply(&values);

        prop_assert_eq!(cleaned.len(), values.len());
        for (i, (&before, &after)) in values.iter().zip(&cleaned).enumerate() {
            if report.outlier_indices.contains(&i) {
                prop_assert_eq!(after, report.median);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn perfect_forecast_has_zero_error(values in prop::collection::vec(0.5..500.0_f64, 1..30)) {
        let metrics = evaluate(&values, &values).unwrap();
        prop_assert_eq!(metrics.mse, 0.0);
        prop_assert_eq!(metrics.mae, 0.0);
        prop_assert_eq!(metrics.rmse, 0.0);
        prop_assert_eq!(metrics.mape, Some(0.0));
    }
}

#[test]
fn test_seeded_noisy_series() {
    let forecaster = EnsembleForecaster::with_defaults().unwrap();

    for seed in [7, 42, 2024] {
        let values = noisy_series(60, seed);
        let points = forecaster.forecast(&make_series(&values), "T2M", 7, "");

        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.value.is_finite()));
        assert!(points.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }
}
