//! Metrics for evaluating forecast performance

use crate::ensemble::ForecastPoint;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// How MAPE treats actual values of zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapePolicy {
    /// Average over the non-zero actuals only
    #[default]
    SkipZeros,
    /// Fail on the first zero actual
    Strict,
}

/// Accuracy of a forecast against observed values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, `None` when every actual is zero
    pub mape: Option<f64>,
}

/// Evaluate forecast accuracy with the default MAPE policy
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    evaluate_with(actual, predicted, MapePolicy::default())
}

/// Evaluate forecast accuracy against actual values
pub fn evaluate_with(
    actual: &[f64],
    predicted: &[f64],
    policy: MapePolicy,
) -> Result<AccuracyMetrics> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    if policy == MapePolicy::Strict {
        if let Some(index) = actual.iter().position(|&a| a == 0.0) {
            return Err(ForecastError::ZeroActual { index });
        }
    }

    // Relative to |actual| so below-zero readings still give a positive error.
    let percentages: Vec<f64> = actual
        .iter()
        .zip(&errors)
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &e)| e.abs() / a.abs() * 100.0)
        .collect();
    let mape = if percentages.is_empty() {
        None
    } else {
        Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
    };

    Ok(AccuracyMetrics {
        mse,
        mae,
        rmse,
        mape,
    })
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:     {:.4}", self.mae)?;
        writeln!(f, "  MSE:     {:.4}", self.mse)?;
        writeln!(f, "  RMSE:    {:.4}", self.rmse)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE:    {:.4}%", mape)?,
            None => writeln!(f, "  MAPE:    undefined")?,
        }
        Ok(())
    }
}

/// Headline numbers of one field's forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Mean confidence over all points
    pub average_confidence: f64,
    /// Largest minus smallest forecast value
    pub value_range: f64,
    /// Number of forecast points
    pub points: usize,
}

impl ForecastSummary {
    /// Summarize a forecast, or `None` when it is empty
    pub fn summarize(points: &[ForecastPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let average_confidence = points.iter().map(|p| p.confidence).mean();
        let (low, high) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), p| {
                (low.min(p.value), high.max(p.value))
            });
        let value_range = high - low;

        Some(Self {
            average_confidence,
            value_range,
            points: points.len(),
        })
    }
}

impl std::fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Summary:")?;
        writeln!(f, "  Points:      {}", self.points)?;
        writeln!(f, "  Confidence:  {:.1}%", self.average_confidence * 100.0)?;
        writeln!(f, "  Range:       {:.3}", self.value_range)?;
        Ok(())
    }
}
