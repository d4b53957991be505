//! Forecaster configuration
//!
//! Every heuristic constant of the pipeline lives here. Sections deserialize
//! with `#[serde(default)]`, so a TOML file only needs the keys it overrides:
//!
//! ```toml
//! [holt_winters]
//! season_length = 5
//!
//! [ensemble]
//! min_history = 21
//! ```

use crate::error::{ForecastError, Result};
use crate::weights::EnsembleWeights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Most decimal places an `f64` forecast can meaningfully keep
pub const MAX_PRECISION: u32 = 15;

/// How autoregressive coefficients are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArEstimator {
    /// Independent `sum(x*y) / sum(x^2)` ratio per lag
    #[default]
    PerFeature,
    /// Joint least squares via the normal equations
    Joint,
}

/// Autoregressive-difference model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaConfig {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q), carried but not fitted
    pub q: usize,
    /// Coefficient estimator
    pub estimator: ArEstimator,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self {
            p: 3,
            d: 1,
            q: 2,
            estimator: ArEstimator::PerFeature,
        }
    }
}

/// Moving-average-with-trend model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    /// Rolling window size
    pub window: usize,
    /// How many trailing averages feed the trend fit
    pub trend_points: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            window: 10,
            trend_points: 14,
        }
    }
}

/// Seasonal exponential smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltWintersConfig {
    /// Level smoothing
    pub alpha: f64,
    /// Trend smoothing
    pub beta: f64,
    /// Seasonal smoothing
    pub gamma: f64,
    /// Season length in days
    pub season_length: usize,
}

impl Default for HoltWintersConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            season_length: 7,
        }
    }
}

/// Additive weight shift applied when an insight flag fires
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightShift {
    pub arima: f64,
    pub seasonal: f64,
    pub moving_average: f64,
}

/// Blending, bias and output parameters of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Minimum present values needed before forecasting
    pub min_history: usize,
    /// Weights before any adjustment
    pub prior: EnsembleWeights,
    /// Shift applied when seasonality is mentioned
    pub seasonality_shift: WeightShift,
    /// Shift applied when a trend direction is mentioned
    pub trend_shift: WeightShift,
    /// Shift applied when volatility exceeds `volatility_threshold`
    pub volatility_shift: WeightShift,
    /// Insight volatility above which `volatility_shift` applies
    pub volatility_threshold: f64,
    /// Trailing points used for the recent trend
    pub trend_window: usize,
    /// Trailing points used for the recent volatility
    pub volatility_window: usize,
    /// Per-step scale of the narrated trend nudge
    pub bias_scale: f64,
    /// Decimal places kept in output values, at most `MAX_PRECISION`
    pub precision: u32,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            min_history: 14,
            prior: EnsembleWeights::new(0.4, 0.4, 0.2),
            seasonality_shift: WeightShift {
                arima: -0.1,
                seasonal: 0.2,
                moving_average: -0.1,
            },
            trend_shift: WeightShift {
                arima: 0.15,
                seasonal: -0.1,
                moving_average: -0.05,
            },
            volatility_shift: WeightShift {
                arima: -0.1,
                seasonal: -0.05,
                moving_average: 0.15,
            },
            volatility_threshold: 0.6,
            trend_window: 7,
            volatility_window: 14,
            bias_scale: 0.1,
            precision: 3,
        }
    }
}

/// Per-step confidence scoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub base: f64,
    /// Trailing points used for the coefficient of variation
    pub cv_window: usize,
    pub max_cv_penalty: f64,
    /// Penalty per forecast step
    pub step_penalty: f64,
    /// Series length giving one unit of data-quality bonus
    pub quality_divisor: f64,
    pub max_quality_bonus: f64,
    /// Scale on (insight confidence - neutral confidence)
    pub insight_scale: f64,
    pub seasonality_bonus: f64,
    pub trend_bonus: f64,
    pub floor: f64,
    /// Optional upper cap, unbounded unless configured
    pub ceiling: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: 0.98,
            cv_window: 21,
            max_cv_penalty: 0.4,
            step_penalty: 0.03,
            quality_divisor: 30.0,
            max_quality_bonus: 0.1,
            insight_scale: 0.2,
            seasonality_bonus: 0.05,
            trend_bonus: 0.03,
            floor: 0.4,
            ceiling: f64::INFINITY,
        }
    }
}

/// Values the insight analyzer assigns on detection or absence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub high_volatility: f64,
    pub low_volatility: f64,
    pub forecast_confidence: f64,
    pub default_confidence: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            high_volatility: 0.8,
            low_volatility: 0.3,
            forecast_confidence: 0.8,
            default_confidence: 0.5,
        }
    }
}

/// Complete forecaster configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    /// Denominator regularization of every trend fit
    pub regularization: f64,
    /// Tukey fence multiplier of the outlier preprocessor
    pub iqr_multiplier: f64,
    pub arima: ArimaConfig,
    pub moving_average: MovingAverageConfig,
    pub holt_winters: HoltWintersConfig,
    pub ensemble: EnsembleConfig,
    pub confidence: ConfidenceConfig,
    pub insight: InsightConfig,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            regularization: forecast_math::regression::DEFAULT_REGULARIZATION,
            iqr_multiplier: forecast_math::outliers::DEFAULT_IQR_MULTIPLIER,
            arima: ArimaConfig::default(),
            moving_average: MovingAverageConfig::default(),
            holt_winters: HoltWintersConfig::default(),
            ensemble: EnsembleConfig::default(),
            confidence: ConfidenceConfig::default(),
            insight: InsightConfig::default(),
        }
    }
}

impl ForecasterConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every section for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(invalid("regularization must be finite and non-negative"));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(invalid("iqr_multiplier must be finite and non-negative"));
        }
        if self.arima.p == 0 {
            return Err(invalid("arima.p must be at least 1"));
        }
        if self.moving_average.window == 0 || self.moving_average.trend_points == 0 {
            return Err(invalid(
                "moving_average.window and moving_average.trend_points must be at least 1",
            ));
        }

        let hw = &self.holt_winters;
        for (name, value) in [("alpha", hw.alpha), ("beta", hw.beta), ("gamma", hw.gamma)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(invalid(&format!(
                    "holt_winters.{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if hw.season_length == 0 {
            return Err(invalid("holt_winters.season_length must be at least 1"));
        }

        let ensemble = &self.ensemble;
        ensemble.prior.validate()?;
        if ensemble.min_history < 2 {
            return Err(invalid("ensemble.min_history must be at least 2"));
        }
        if ensemble.precision > MAX_PRECISION {
            return Err(invalid(&format!(
                "ensemble.precision must be at most {}, got {}",
                MAX_PRECISION, ensemble.precision
            )));
        }
        if ensemble.trend_window == 0 || ensemble.volatility_window == 0 {
            return Err(invalid(
                "ensemble.trend_window and ensemble.volatility_window must be at least 1",
            ));
        }

        let confidence = &self.confidence;
        if confidence.cv_window == 0 {
            return Err(invalid("confidence.cv_window must be at least 1"));
        }
        if confidence.quality_divisor <= 0.0 {
            return Err(invalid("confidence.quality_divisor must be positive"));
        }
        if confidence.step_penalty < 0.0 {
            return Err(invalid("confidence.step_penalty must be non-negative"));
        }
        if !(0.0..=1.0).contains(&confidence.floor) {
            return Err(invalid("confidence.floor must be within [0, 1]"));
        }
        if confidence.ceiling.is_nan() || confidence.ceiling < confidence.floor {
            return Err(invalid("confidence.ceiling must not be below confidence.floor"));
        }

        let insight = &self.insight;
        for (name, value) in [
            ("high_volatility", insight.high_volatility),
            ("low_volatility", insight.low_volatility),
            ("forecast_confidence", insight.forecast_confidence),
            ("default_confidence", insight.default_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!(
                    "insight.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ForecastError {
    ForecastError::InvalidParameter(message.to_string())
}
