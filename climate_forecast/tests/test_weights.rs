use assert_approx_eq::assert_approx_eq;
use climate_forecast::config::{EnsembleConfig, WeightShift};
use climate_forecast::{EnsembleWeights, InsightSignal, TrendDirection};
use rstest::rstest;

fn signal(seasonality: bool, trend: TrendDirection, volatility: f64) -> InsightSignal {
    InsightSignal {
        trend_direction: trend,
        seasonality,
        volatility,
        confidence: 0.5,
    }
}

#[rstest]
#[case(false, TrendDirection::Unspecified, 0.3, (0.4, 0.4, 0.2))]
#[case(true, TrendDirection::Unspecified, 0.3, (0.3, 0.6, 0.1))]
#[case(false, TrendDirection::Up, 0.3, (0.55, 0.3, 0.15))]
#[case(false, TrendDirection::Down, 0.3, (0.55, 0.3, 0.15))]
#[case(false, TrendDirection::Stable, 0.3, (0.4, 0.4, 0.2))]
#[case(false, TrendDirection::Unspecified, 0.8, (0.3, 0.35, 0.35))]
#[case(true, TrendDirection::Up, 0.3, (0.45, 0.5, 0.05))]
#[case(true, TrendDirection::Unspecified, 0.8, (0.2, 0.55, 0.25))]
#[case(false, TrendDirection::Down, 0.8, (0.45, 0.25, 0.3))]
#[case(true, TrendDirection::Up, 0.8, (0.35, 0.45, 0.2))]
fn test_weights_for_insight(
    #[case] seasonality: bool,
    #[case] trend: TrendDirection,
    #[case] volatility: f64,
    #[case] expected: (f64, f64, f64),
) {
    let weights = EnsembleWeights::for_insight(
        &EnsembleConfig::default(),
        &signal(seasonality, trend, volatility),
    );

    assert_approx_eq!(weights.arima, expected.0, 1e-12);
    assert_approx_eq!(weights.seasonal, expected.1, 1e-12);
    assert_approx_eq!(weights.moving_average, expected.2, 1e-12);
    assert_approx_eq!(weights.sum(), 1.0, 1e-12);
}

#[test]
fn test_volatility_threshold_is_exclusive() {
    let weights = EnsembleWeights::for_insight(
        &EnsembleConfig::default(),
        &signal(false, TrendDirection::Unspecified, 0.6),
    );
    assert_approx_eq!(weights.arima, 0.4, 1e-12);
    assert_approx_eq!(weights.moving_average, 0.2, 1e-12);
}

#[test]
fn test_negative_weights_are_clamped() {
    let normalized =
        EnsembleWeights::new(-0.1, 0.6, 0.5).normalized_or(EnsembleWeights::default());

    assert_eq!(normalized.arima, 0.0);
    assert_approx_eq!(normalized.seasonal, 0.6 / 1.1, 1e-12);
    assert_approx_eq!(normalized.moving_average, 0.5 / 1.1, 1e-12);
}

#[test]
fn test_clamped_prior_through_shift() {
    let config = EnsembleConfig {
        prior: EnsembleWeights::new(0.05, 0.5, 0.45),
        ..EnsembleConfig::default()
    };
    let weights = EnsembleWeights::for_insight(
        &config,
        &signal(true, TrendDirection::Unspecified, 0.3),
    );

    // arima 0.05 - 0.1 clamps to zero
    assert_eq!(weights.arima, 0.0);
    assert_approx_eq!(weights.seasonal, 0.7 / 1.05, 1e-12);
    assert_approx_eq!(weights.moving_average, 0.35 / 1.05, 1e-12);
}

#[test]
fn test_all_zero_falls_back_to_prior() {
    let prior = EnsembleWeights::new(2.0, 2.0, 1.0);
    let normalized = EnsembleWeights::new(-1.0, 0.0, -0.5).normalized_or(prior);

    assert_approx_eq!(normalized.arima, 0.4, 1e-12);
    assert_approx_eq!(normalized.seasonal, 0.4, 1e-12);
    assert_approx_eq!(normalized.moving_average, 0.2, 1e-12);

    let zero = EnsembleWeights::new(0.0, 0.0, 0.0);
    let thirds = zero.normalized_or(zero);
    assert_approx_eq!(thirds.arima, 1.0 / 3.0, 1e-12);
    assert_approx_eq!(thirds.sum(), 1.0, 1e-12);
}

#[test]
fn test_shift_and_blend() {
    let shifted = EnsembleWeights::new(0.4, 0.4, 0.2).shifted(&WeightShift {
        arima: 0.1,
        seasonal: -0.2,
        moving_average: 0.0,
    });
    assert_approx_eq!(shifted.arima, 0.5, 1e-12);
    assert_approx_eq!(shifted.seasonal, 0.2, 1e-12);

    let weights = EnsembleWeights::new(0.5, 0.25, 0.25);
    assert_approx_eq!(weights.blend(10.0, 20.0, 40.0), 20.0, 1e-12);
}

#[test]
fn test_validate() {
    assert!(EnsembleWeights::new(0.4, 0.4, 0.2).validate().is_ok());
    assert!(EnsembleWeights::new(-0.1, 0.4, 0.2).validate().is_err());
    assert!(EnsembleWeights::new(0.0, 0.0, 0.0).validate().is_err());
    assert!(EnsembleWeights::new(f64::NAN, 0.4, 0.2).validate().is_err());
}
