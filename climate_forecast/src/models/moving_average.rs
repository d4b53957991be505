//! Moving average with linear trend extrapolation

use crate::config::MovingAverageConfig;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use forecast_math::regression::{LinearFit, LinearRegression};
use forecast_math::statistics::tail;

/// Trailing simple moving average whose recent trend is extrapolated
#[derive(Debug, Clone)]
pub struct MovingAverageTrend {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
    /// Number of trailing averages the trend is fit on
    trend_points: usize,
    /// Trend estimator
    regression: LinearRegression,
}

/// Trained moving average model
#[derive(Debug, Clone)]
pub struct TrainedMovingAverageTrend {
    /// Name of the model
    name: String,
    /// Moving average at every index from `window - 1` onward
    averages: Vec<f64>,
    /// Trend over the recent averages, `None` when the series was shorter than the window
    trend: Option<LinearFit>,
    /// Index of the last average within the fitted range
    last_index: usize,
}

impl MovingAverageTrend {
    /// Create a new model
    pub fn new(window: usize, trend_points: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }
        if trend_points == 0 {
            return Err(ForecastError::InvalidParameter(
                "Trend points must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Moving Average with Trend (window={})", window),
            window,
            trend_points,
            regression: LinearRegression::default(),
        })
    }

    /// Create a model from its configuration section
    pub fn from_config(config: &MovingAverageConfig, regularization: f64) -> Result<Self> {
        Ok(Self::new(config.window, config.trend_points)?
            .with_regression(LinearRegression::new(regularization)?))
    }

    /// Replace the trend estimator
    pub fn with_regression(mut self, regression: LinearRegression) -> Self {
        self.regression = regression;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Trailing simple moving averages; empty when the series is shorter than the window
    pub fn rolling_averages(&self, series: &[f64]) -> Vec<f64> {
        series
            .windows(self.window)
            .map(|w| w.iter().sum::<f64>() / self.window as f64)
            .collect()
    }
}

impl ForecastModel for MovingAverageTrend {
    type Trained = TrainedMovingAverageTrend;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        let averages = self.rolling_averages(series);
        if averages.is_empty() {
            return Ok(TrainedMovingAverageTrend {
                name: self.name.clone(),
                averages,
                trend: None,
                last_index: 0,
            });
        }

        let recent = tail(&averages, self.trend_points);
        let trend = self.regression.fit_indexed(recent);
        let last_index = recent.len() - 1;

        Ok(TrainedMovingAverageTrend {
            name: self.name.clone(),
            averages,
            trend: Some(trend),
            last_index,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedMovingAverageTrend {
    /// The moving averages computed during training
    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    /// Fitted trend over the recent averages
    pub fn trend(&self) -> Option<LinearFit> {
        self.trend
    }
}

impl TrainedForecastModel for TrainedMovingAverageTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let Some(trend) = self.trend else {
            return Ok(ForecastResult::declined(horizon));
        };

        let values = (1..=horizon)
            .map(|step| trend.value_at((self.last_index + step) as f64))
            .collect();

        ForecastResult::new(values, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
