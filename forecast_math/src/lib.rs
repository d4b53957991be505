//! # Forecast Math
//!
//! Numeric building blocks for the climate forecaster.
//! This crate provides the regularized trend fit, IQR outlier cleaning,
//! sorted-index order statistics, differencing and a small dense solver.
//! Nothing in here knows about dates, fields or models.

use thiserror::Error;

pub mod linalg;
pub mod outliers;
pub mod regression;
pub mod statistics;

pub use crate::outliers::{OutlierFilter, OutlierReport};
pub use crate::regression::LinearRegression;

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular system: {0}")]
    SingularMatrix(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
