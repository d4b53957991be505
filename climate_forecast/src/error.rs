//! Error types for the climate_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the climate_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Not enough present values in a field to forecast it
    #[error("Insufficient history for '{field}': need {required} values, have {available}")]
    InsufficientHistory {
        field: String,
        required: usize,
        available: usize,
    },

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A zero actual value under a strict MAPE policy
    #[error("MAPE is undefined: actual value at index {index} is zero")]
    ZeroActual { index: usize },

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from date parsing
    #[error("Date parse error: {0}")]
    DateError(#[from] chrono::ParseError),

    /// Error from configuration decoding
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from compiling a detector pattern
    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
