//! Per-step confidence scoring
//!
//! Confidence starts from a base value, is penalized by the recent
//! coefficient of variation and by distance into the horizon, and gains a
//! small bonus for longer histories and for insight text that sounded sure
//! of itself. The result never drops below `floor`.
//! There is no upper cap unless `ceiling` is configured.

use crate::config::{ConfidenceConfig, InsightConfig};
use crate::insight::InsightSignal;
use forecast_math::statistics::{coefficient_of_variation, tail};

/// Scores forecast steps for one cleaned series
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
    /// Insight confidence that contributes no adjustment
    neutral_confidence: f64,
}

impl ConfidenceScorer {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self {
            config,
            neutral_confidence: InsightConfig::default().default_confidence,
        }
    }

    /// Set the insight confidence treated as neutral
    pub fn with_neutral_confidence(mut self, neutral_confidence: f64) -> Self {
        self.neutral_confidence = neutral_confidence;
        self
    }

    /// Penalty from the coefficient of variation of the trailing window,
    /// capped at `max_cv_penalty`
    pub fn variation_penalty(&self, series: &[f64]) -> f64 {
        let recent = tail(series, self.config.cv_window);
        coefficient_of_variation(recent)
            .unwrap_or(0.0)
            .min(self.config.max_cv_penalty)
    }

    /// Bonus for history length, capped at `max_quality_bonus`
    pub fn quality_bonus(&self, series_len: usize) -> f64 {
        (series_len as f64 / self.config.quality_divisor).min(self.config.max_quality_bonus)
    }

    /// Adjustment contributed by the insight signal
    pub fn insight_adjustment(&self, signal: &InsightSignal) -> f64 {
        let mut adjustment =
            (signal.confidence - self.neutral_confidence) * self.config.insight_scale;
        if signal.seasonality {
            adjustment += self.config.seasonality_bonus;
        }
        if signal.trend_direction.sign() != 0 {
            adjustment += self.config.trend_bonus;
        }
        adjustment
    }

    /// Confidence of the 0-based forecast `step`
    pub fn score(&self, series: &[f64], signal: &InsightSignal, step: usize) -> f64 {
        let offset = self.offset(series, signal);
        self.clamp(offset - self.config.step_penalty * step as f64)
    }

    /// Confidence for every step of a horizon, nearest first
    pub fn scores(&self, series: &[f64], signal: &InsightSignal, horizon: usize) -> Vec<f64> {
        let offset = self.offset(series, signal);
        (0..horizon)
            .map(|step| self.clamp(offset - self.config.step_penalty * step as f64))
            .collect()
    }

    /// Everything that does not depend on the step
    fn offset(&self, series: &[f64], signal: &InsightSignal) -> f64 {
        self.config.base + self.insight_adjustment(signal) - self.variation_penalty(series)
            + self.quality_bonus(series.len())
    }

    fn clamp(&self, confidence: f64) -> f64 {
        confidence.max(self.config.floor).min(self.config.ceiling)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ConfidenceConfig::default())
    }
}
