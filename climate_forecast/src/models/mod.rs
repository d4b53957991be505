//! Forecasting models for daily climate series
//!
//! Every model is refit from scratch on each call: `train` consumes the
//! cleaned series and returns a trained value that only knows how to
//! extrapolate. Nothing is cached between calls.

use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values, empty when the model declined to forecast
    values: Vec<f64>,
    /// Number of periods requested
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self { values, horizons })
    }

    /// A result for a model that produced no output for this input
    pub fn declined(horizons: usize) -> Self {
        Self {
            values: Vec::new(),
            horizons,
        }
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods requested
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Whether the model produced no output
    pub fn is_declined(&self) -> bool {
        self.values.is_empty() && self.horizons > 0
    }

    /// Value at a 0-based step, if the model produced one
    pub fn value_at(&self, step: usize) -> Option<f64> {
        self.values.get(step).copied()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a numeric series
pub trait ForecastModel: Debug + Clone + Send + Sync {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a series
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Train on `series` and forecast `horizons` steps in one go
    fn fit_forecast(&self, series: &[f64], horizons: usize) -> Result<ForecastResult> {
        self.train(series)?.forecast(horizons)
    }
}

pub(crate) fn require_data(series: &[f64], model: &str) -> Result<()> {
    if series.is_empty() {
        return Err(ForecastError::DataError(format!(
            "Empty time series data for {}",
            model
        )));
    }
    Ok(())
}

pub mod arima;
pub mod exponential_smoothing;
pub mod moving_average;

pub use arima::{ArimaModel, TrainedArimaModel};
pub use exponential_smoothing::{HoltWinters, TrainedHoltWinters};
pub use moving_average::{MovingAverageTrend, TrainedMovingAverageTrend};
