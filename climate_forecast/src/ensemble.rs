//! Insight-weighted ensemble of the three forecasting models
//!
//! One call runs the whole pipeline from scratch: outlier cleaning, insight
//! parsing, the three models (in parallel), weight derivation, per-step
//! blending with a narrated-trend nudge, date stamping and confidence
//! scoring. No state is shared between calls.

use crate::confidence::ConfidenceScorer;
use crate::config::ForecasterConfig;
use crate::data::{following_days, ObservationSeries};
use crate::error::{ForecastError, Result};
use crate::insight::{InsightAnalyzer, InsightSignal};
use crate::models::{ArimaModel, ForecastModel, ForecastResult, HoltWinters, MovingAverageTrend};
use crate::weights::EnsembleWeights;
use chrono::NaiveDate;
use forecast_math::regression::LinearRegression;
use forecast_math::statistics::{population_std_dev, tail};
use forecast_math::OutlierFilter;
use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dated forecast value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(with = "crate::data::date_key")]
    pub date: NaiveDate,
    pub value: f64,
    /// Never below the configured floor
    pub confidence: f64,
}

/// Recent behavior of a cleaned series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesProfile {
    /// Slope of the trend over the trailing trend window
    pub trend_slope: f64,
    /// Population standard deviation over the trailing volatility window
    pub volatility: f64,
}

/// The three model outputs for one call
#[derive(Debug, Clone)]
struct MemberForecasts {
    arima: ForecastResult,
    seasonal: ForecastResult,
    moving_average: ForecastResult,
}

/// Ensemble forecaster
#[derive(Debug, Clone)]
pub struct EnsembleForecaster {
    config: ForecasterConfig,
    outliers: OutlierFilter,
    trend: LinearRegression,
    arima: ArimaModel,
    holt_winters: HoltWinters,
    moving_average: MovingAverageTrend,
    analyzer: InsightAnalyzer,
    scorer: ConfidenceScorer,
}

impl EnsembleForecaster {
    /// Create a forecaster from a validated configuration
    pub fn new(config: ForecasterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            outliers: OutlierFilter::new(config.iqr_multiplier)?,
            trend: LinearRegression::new(config.regularization)?,
            arima: ArimaModel::from_config(&config.arima)?,
            holt_winters: HoltWinters::from_config(&config.holt_winters)?,
            moving_average: MovingAverageTrend::from_config(
                &config.moving_average,
                config.regularization,
            )?,
            analyzer: InsightAnalyzer::new(config.insight)?,
            scorer: ConfidenceScorer::new(config.confidence)
                .with_neutral_confidence(config.insight.default_confidence),
            config,
        })
    }

    /// Create a forecaster with every default
    pub fn with_defaults() -> Result<Self> {
        Self::new(ForecasterConfig::default())
    }

    pub fn config(&self) -> &ForecasterConfig {
        &self.config
    }

    /// Parse insight text into a signal
    pub fn analyze_insight(&self, insight: &str) -> InsightSignal {
        self.analyzer.analyze(insight)
    }

    /// Normalized blend weights for a signal
    pub fn weights_for(&self, signal: &InsightSignal) -> EnsembleWeights {
        EnsembleWeights::for_insight(&self.config.ensemble, signal)
    }

    /// Trend and volatility of the trailing windows of `cleaned`
    pub fn profile(&self, cleaned: &[f64]) -> SeriesProfile {
        let ensemble = &self.config.ensemble;
        let recent = tail(cleaned, ensemble.trend_window);
        let trend_slope = if recent.len() < 2 {
            0.0
        } else {
            self.trend.fit_indexed(recent).slope
        };
        let volatility =
            population_std_dev(tail(cleaned, ensemble.volatility_window)).unwrap_or(0.0);

        SeriesProfile {
            trend_slope,
            volatility,
        }
    }

    /// Forecast one field, returning an empty sequence when it cannot
    ///
    /// Short histories come back empty; use [`try_forecast`](Self::try_forecast)
    /// to tell them apart from other failures.
    pub fn forecast(
        &self,
        series: &ObservationSeries,
        field: &str,
        horizon: usize,
        insight: &str,
    ) -> Vec<ForecastPoint> {
        match self.try_forecast(series, field, horizon, insight) {
            Ok(points) => points,
            Err(ForecastError::InsufficientHistory {
                required,
                available,
                ..
            }) => {
                debug!(
                    "Skipping '{}': {} of {} required values",
                    field, available, required
                );
                Vec::new()
            }
            Err(err) => {
                warn!("Forecast for '{}' failed: {}", field, err);
                Vec::new()
            }
        }
    }

    /// Forecast one field of an observation series
    pub fn try_forecast(
        &self,
        series: &ObservationSeries,
        field: &str,
        horizon: usize,
        insight: &str,
    ) -> Result<Vec<ForecastPoint>> {
        if !series.has_field(field) {
            warn!("Field '{}' does not occur in the series", field);
        }

        let values = series.values_for(field);
        let last_date = series.last_date().ok_or(ForecastError::InsufficientHistory {
            field: field.to_string(),
            required: self.config.ensemble.min_history,
            available: 0,
        })?;

        self.forecast_values(field, &values, last_date, horizon, insight)
    }

    /// Forecast a bare value sequence whose last reading was on `last_date`
    pub fn forecast_values(
        &self,
        field: &str,
        values: &[f64],
        last_date: NaiveDate,
        horizon: usize,
        insight: &str,
    ) -> Result<Vec<ForecastPoint>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be at least 1".to_string(),
            ));
        }
        let required = self.config.ensemble.min_history;
        if values.len() < required {
            warn!(
                "'{}' has {} values, {} are needed to forecast",
                field,
                values.len(),
                required
            );
            return Err(ForecastError::InsufficientHistory {
                field: field.to_string(),
                required,
                available: values.len(),
            });
        }

        let cleaned = self.outliers.clean(values);
        let signal = self.analyze_insight(insight);
        let members = self.run_members(&cleaned, horizon)?;
        let profile = self.profile(&cleaned);
        let weights = self.weights_for(&signal);
        debug!(
            "'{}': signal {:?}, profile {:?}, weights {:?}",
            field, signal, profile, weights
        );

        let dates = following_days(last_date, horizon)?;
        let confidences = self.scorer.scores(&cleaned, &signal, horizon);
        let direction = f64::from(signal.trend_direction.sign());
        let nudge = direction * profile.volatility * self.config.ensemble.bias_scale;

        let points = dates
            .into_iter()
            .zip(confidences)
            .enumerate()
            .map(|(step, (date, confidence))| {
                let blended = members.blend(&weights, step);
                let bias = nudge * (step + 1) as f64;
                let value = round_to(blended + bias, self.config.ensemble.precision);
                trace!("'{}' step {}: {} (bias {})", field, step + 1, value, bias);

                ForecastPoint {
                    date,
                    value,
                    confidence,
                }
            })
            .collect();

        Ok(points)
    }

    /// Forecast several fields in parallel; fields that cannot be forecast
    /// map to an empty sequence
    pub fn forecast_fields<S>(
        &self,
        series: &ObservationSeries,
        fields: &[S],
        horizon: usize,
        insight: &str,
    ) -> BTreeMap<String, Vec<ForecastPoint>>
    where
        S: AsRef<str> + Sync,
    {
        fields
            .par_iter()
            .map(|field| {
                let field = field.as_ref();
                (
                    field.to_string(),
                    self.forecast(series, field, horizon, insight),
                )
            })
            .collect()
    }

    fn run_members(&self, cleaned: &[f64], horizon: usize) -> Result<MemberForecasts> {
        let (arima, (seasonal, moving_average)) = rayon::join(
            || self.arima.fit_forecast(cleaned, horizon),
            || {
                rayon::join(
                    || self.holt_winters.fit_forecast(cleaned, horizon),
                    || self.moving_average.fit_forecast(cleaned, horizon),
                )
            },
        );

        let members = MemberForecasts {
            arima: arima?,
            seasonal: seasonal?,
            moving_average: moving_average?,
        };
        debug!(
            "{}: {:?}; {}: {:?}; {}: {:?}",
            self.arima.name(),
            members.arima.values(),
            self.holt_winters.name(),
            members.seasonal.values(),
            self.moving_average.name(),
            members.moving_average.values()
        );
        Ok(members)
    }
}

impl MemberForecasts {
    /// Weighted value at `step`; a model with no output there stands in
    /// with the autoregressive value
    fn blend(&self, weights: &EnsembleWeights, step: usize) -> f64 {
        let anchor = self.arima.value_at(step).unwrap_or(0.0);
        weights.blend(
            anchor,
            self.seasonal.value_at(step).unwrap_or(anchor),
            self.moving_average.value_at(step).unwrap_or(anchor),
        )
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
