//! Blend weights for the three ensemble members

use crate::config::{EnsembleConfig, WeightShift};
use crate::error::{ForecastError, Result};
use crate::insight::InsightSignal;
use serde::{Deserialize, Serialize};

/// Weights of the autoregressive, seasonal and moving-average forecasts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleWeights {
    pub arima: f64,
    pub seasonal: f64,
    pub moving_average: f64,
}

impl EnsembleWeights {
    /// Create a weight triple as given, without normalizing
    pub fn new(arima: f64, seasonal: f64, moving_average: f64) -> Self {
        Self {
            arima,
            seasonal,
            moving_average,
        }
    }

    /// Require finite, non-negative weights with a positive sum
    pub fn validate(&self) -> Result<()> {
        let all = [self.arima, self.seasonal, self.moving_average];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Weights must be finite and non-negative, got {:?}",
                self
            )));
        }
        if self.sum() <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Weights must not all be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.arima + self.seasonal + self.moving_average
    }

    /// Add a shift to each weight
    pub fn shifted(self, shift: &WeightShift) -> Self {
        Self {
            arima: self.arima + shift.arima,
            seasonal: self.seasonal + shift.seasonal,
            moving_average: self.moving_average + shift.moving_average,
        }
    }

    /// Clamp at zero and rescale to sum to one; `fallback` is used when
    /// nothing positive is left.
    pub fn normalized_or(self, fallback: EnsembleWeights) -> Self {
        let clamped = Self {
            arima: self.arima.max(0.0),
            seasonal: self.seasonal.max(0.0),
            moving_average: self.moving_average.max(0.0),
        };
        let total = clamped.sum();
        if total > 0.0 && total.is_finite() {
            Self {
                arima: clamped.arima / total,
                seasonal: clamped.seasonal / total,
                moving_average: clamped.moving_average / total,
            }
        } else if fallback.sum() > 0.0 {
            fallback.normalized_or(Self::new(1.0, 1.0, 1.0))
        } else {
            Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        }
    }

    /// Derive normalized weights from the configured priors and an insight signal
    pub fn for_insight(config: &EnsembleConfig, signal: &InsightSignal) -> Self {
        let mut weights = config.prior;

        if signal.seasonality {
            weights = weights.shifted(&config.seasonality_shift);
        }
        if signal.trend_direction.sign() != 0 {
            weights = weights.shifted(&config.trend_shift);
        }
        if signal.volatility > config.volatility_threshold {
            weights = weights.shifted(&config.volatility_shift);
        }

        weights.normalized_or(config.prior)
    }

    /// Weighted sum of one step of each model's output
    pub fn blend(&self, arima: f64, seasonal: f64, moving_average: f64) -> f64 {
        self.arima * arima + self.seasonal * seasonal + self.moving_average * moving_average
    }
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        EnsembleConfig::default().prior
    }
}
