//! Regularized least-squares trend estimation
//!
//! The closed-form simple regression used for trend sign/magnitude and for
//! extrapolating smoothed series. A small constant is added to the slope
//! denominator so that a zero-variance regressor yields a finite slope.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Regularization applied when none is configured.
pub const DEFAULT_REGULARIZATION: f64 = 0.01;

/// Linear Regression with an additive denominator regularization term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    regularization: f64,
}

/// Slope and intercept produced by [`LinearRegression::fit`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in y per unit of x
    pub slope: f64,
    /// Value of y at x = 0
    pub intercept: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self {
            regularization: DEFAULT_REGULARIZATION,
        }
    }
}

impl LinearRegression {
    /// Create a new Linear Regression with the given denominator regularization
    pub fn new(regularization: f64) -> Result<Self> {
        if !regularization.is_finite() || regularization < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Regularization must be a finite non-negative number, got {}",
                regularization
            )));
        }

        Ok(Self { regularization })
    }

    /// Get the regularization constant
    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// Fit slope and intercept of `ys` against `xs`.
    ///
    /// An empty input yields a zero line. Constant `xs` yield a slope
    /// governed by the regularized denominator instead of a division error.
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "Regressor length ({}) doesn't match response length ({})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Ok(LinearFit {
                slope: 0.0,
                intercept: 0.0,
            });
        }

        let n = xs.len() as f64;
        let sum_x: f64 = xs.iter().sum();
        let sum_y: f64 = ys.iter().sum();
        let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
        let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

        let denominator = n * sum_xx - sum_x * sum_x + self.regularization;
        let slope = if denominator == 0.0 {
            0.0
        } else {
            (n * sum_xy - sum_x * sum_y) / denominator
        };
        let intercept = (sum_y - slope * sum_x) / n;

        Ok(LinearFit { slope, intercept })
    }

    /// Fit `ys` against its own index sequence `0, 1, 2, ...`
    pub fn fit_indexed(&self, ys: &[f64]) -> LinearFit {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        // Lengths match by construction.
        self.fit(&xs, ys).unwrap_or(LinearFit {
            slope: 0.0,
            intercept: 0.0,
        })
    }
}

impl LinearFit {
    /// Evaluate the fitted line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Map arbitrary x-values onto the fitted line
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value_at(x)).collect()
    }
}
