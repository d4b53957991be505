//! # Climate Forecast
//!
//! Short-horizon forecasting of daily climate series with an ensemble of
//! three small models, weighted by signals read from narrative insight text.
//!
//! ## Features
//!
//! - Dated observations with missing values, loaded from CSV
//! - Forecasting models (autoregression on differences, moving average with
//!   trend, Holt-Winters seasonal smoothing)
//! - Keyword-driven insight analysis that reweights the ensemble
//! - Per-step confidence that decays with distance into the horizon
//! - Accuracy metrics (MSE, MAE, RMSE, MAPE) and forecast summaries
//! - Parallel forecasting of several fields
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use climate_forecast::{EnsembleForecaster, ObservationSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let temperatures: Vec<f64> = (0..21).map(|i| 18.0 + 0.2 * i as f64).collect();
//! let series = ObservationSeries::from_values(start, "T2M", &temperatures)?;
//!
//! let forecaster = EnsembleForecaster::with_defaults()?;
//! let points = forecaster.forecast(&series, "T2M", 7, "Temperatures trend upward.");
//!
//! assert_eq!(points.len(), 7);
//! assert!(points.windows(2).all(|w| w[0].confidence >= w[1].confidence));
//! # Ok::<(), climate_forecast::ForecastError>(())
//! ```

pub mod confidence;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod insight;
pub mod metrics;
pub mod models;
pub mod output;
pub mod weights;

// Re-export commonly used types
pub use crate::confidence::ConfidenceScorer;
pub use crate::config::ForecasterConfig;
pub use crate::data::{DataLoader, Observation, ObservationSeries};
pub use crate::ensemble::{EnsembleForecaster, ForecastPoint};
pub use crate::error::ForecastError;
pub use crate::insight::{InsightAnalyzer, InsightSignal, TrendDirection};
pub use crate::metrics::{evaluate, AccuracyMetrics, ForecastSummary, MapePolicy};
pub use crate::models::{ForecastModel, ForecastResult};
pub use crate::weights::EnsembleWeights;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
