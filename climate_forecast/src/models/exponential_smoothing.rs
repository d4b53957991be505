//! Additive Holt-Winters smoothing with a level+trend fallback

use crate::config::HoltWintersConfig;
use crate::error::{ForecastError, Result};
use crate::models::{require_data, ForecastModel, ForecastResult, TrainedForecastModel};
use log::debug;

/// Triple exponential smoothing with an additive seasonal component
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Seasonal smoothing parameter
    gamma: f64,
    /// Season length in observations
    season_length: usize,
}

/// Final smoothing state
#[derive(Debug, Clone, PartialEq)]
enum SmoothingState {
    /// Full seasonal state
    Seasonal {
        level: f64,
        trend: f64,
        /// Seasonal offsets, indexed by observation position modulo the season length
        slots: Vec<f64>,
        /// Number of observations the state was fitted on
        observations: usize,
    },
    /// Level and trend only, used for series shorter than two seasons
    LevelTrend { level: f64, trend: f64 },
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    /// Name of the model
    name: String,
    state: SmoothingState,
}

impl HoltWinters {
    /// Create a new model
    pub fn new(alpha: f64, beta: f64, gamma: f64, season_length: usize) -> Result<Self> {
        for (name, value) in [("Alpha", alpha), ("Beta", beta), ("Gamma", gamma)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and 1",
                    name
                )));
            }
        }
        if season_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Holt-Winters (alpha={}, beta={}, gamma={}, season={})",
                alpha, beta, gamma, season_length
            ),
            alpha,
            beta,
            gamma,
            season_length,
        })
    }

    /// Create a model from its configuration section
    pub fn from_config(config: &HoltWintersConfig) -> Result<Self> {
        Self::new(config.alpha, config.beta, config.gamma, config.season_length)
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Double exponential smoothing seeded from the first two points
    fn level_trend(&self, series: &[f64]) -> SmoothingState {
        let mut level = series[0];
        let mut trend = if series.len() > 1 {
            series[1] - series[0]
        } else {
            0.0
        };

        for &value in &series[1..] {
            let previous = level;
            level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - previous) + (1.0 - self.beta) * trend;
        }

        SmoothingState::LevelTrend { level, trend }
    }

    fn seasonal(&self, series: &[f64]) -> SmoothingState {
        let period = self.season_length;
        let mut level = series[0];
        let mut trend = series[1] - series[0];
        let mut slots: Vec<f64> = series[..period].iter().map(|v| v - level).collect();

        for (i, &value) in series.iter().enumerate().skip(1) {
            let slot = i % period;
            let previous = level;
            level = self.alpha * (value - slots[slot]) + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - previous) + (1.0 - self.beta) * trend;
            slots[slot] = self.gamma * (value - level) + (1.0 - self.gamma) * slots[slot];
        }

        SmoothingState::Seasonal {
            level,
            trend,
            slots,
            observations: series.len(),
        }
    }
}

impl ForecastModel for HoltWinters {
    type Trained = TrainedHoltWinters;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        require_data(series, &self.name)?;

        let state = if series.len() < 2 * self.season_length {
            debug!(
                "{}: {} points is under two seasons, smoothing level and trend only",
                self.name,
                series.len()
            );
            self.level_trend(series)
        } else {
            self.seasonal(series)
        };

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            state,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    /// Whether the seasonal component was fitted
    pub fn is_seasonal(&self) -> bool {
        matches!(self.state, SmoothingState::Seasonal { .. })
    }

    /// Final smoothed level
    pub fn level(&self) -> f64 {
        match self.state {
            SmoothingState::Seasonal { level, .. } | SmoothingState::LevelTrend { level, .. } => {
                level
            }
        }
    }

    /// Final smoothed trend
    pub fn trend(&self) -> f64 {
        match self.state {
            SmoothingState::Seasonal { trend, .. } | SmoothingState::LevelTrend { trend, .. } => {
                trend
            }
        }
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = match &self.state {
            SmoothingState::LevelTrend { level, trend } => (1..=horizon)
                .map(|h| level + h as f64 * trend)
                .collect(),
            // The offset comes from the slot last fitted at that phase.
            SmoothingState::Seasonal {
                level,
                trend,
                slots,
                observations,
            } => (1..=horizon)
                .map(|h| level + h as f64 * trend + slots[(observations - 1 + h) % slots.len()])
                .collect(),
        };

        ForecastResult::new(values, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
