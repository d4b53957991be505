//! IQR outlier detection with median substitution
//!
//! Bounds are `[Q1 - k*IQR, Q3 + k*IQR]` with quartiles and median taken by
//! sorted-index lookup. Values outside the bounds are replaced, never
//! dropped, so the cleaned series stays index-aligned with its input.

use crate::statistics::{median_by_index, quantile_by_index, sorted};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Tukey fence multiplier used when none is configured.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// IQR-based outlier filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    multiplier: f64,
}

/// What a filter pass found in a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
    /// Replacement value
    pub median: f64,
    /// Positions that fell outside the fences
    pub outlier_indices: Vec<usize>,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl OutlierFilter {
    /// Create a filter with a custom fence multiplier
    pub fn new(multiplier: f64) -> Result<Self> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "IQR multiplier must be a finite non-negative number, got {}",
                multiplier
            )));
        }

        Ok(Self { multiplier })
    }

    /// Get the fence multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Compute fences and locate outliers without modifying the series
    pub fn detect(&self, values: &[f64]) -> Result<OutlierReport> {
        let sorted = sorted(values);
        let q1 = quantile_by_index(&sorted, 0.25)?;
        let q3 = quantile_by_index(&sorted, 0.75)?;
        let median = median_by_index(&sorted)?;
        let iqr = q3 - q1;
        let lower_bound = q1 - self.multiplier * iqr;
        let upper_bound = q3 + self.multiplier * iqr;

        let outlier_indices = values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v < lower_bound || v > upper_bound)
            .map(|(i, _)| i)
            .collect();

        Ok(OutlierReport {
            lower_bound,
            upper_bound,
            median,
            outlier_indices,
        })
    }

    /// Replace every outlier with the series median. An empty series stays empty.
    pub fn clean(&self, values: &[f64]) -> Vec<f64> {
        match self.detect(values) {
            Ok(report) => report.apply(values),
            Err(_) => values.to_vec(),
        }
    }
}

impl OutlierReport {
    /// Number of replaced points
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }

    /// Produce the cleaned copy of the series this report was computed on
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&v| {
                if v < self.lower_bound || v > self.upper_bound {
                    self.median
                } else {
                    v
                }
            })
            .collect()
    }
}
