//! # Climate Forecast Workspace
//!
//! Umbrella crate re-exporting the ensemble forecaster and its numeric
//! building blocks.
//!
//! ## Example
//!
//! ```
//! use climate_forecast_workspace::forecaster::{EnsembleForecaster, ObservationSeries};
//! use climate_forecast_workspace::math::statistics::mean;
//!
//! let start = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let readings: Vec<f64> = (0..21).map(|i| 18.0 + (i % 7) as f64).collect();
//! let series = ObservationSeries::from_values(start, "T2M", &readings).unwrap();
//!
//! let forecaster = EnsembleForecaster::with_defaults().unwrap();
//! let points = forecaster.forecast(&series, "T2M", 3, "weekly cycle, stable");
//! assert_eq!(points.len(), 3);
//! assert!((mean(&readings).unwrap() - 21.0).abs() < 1e-12);
//! ```

/// The ensemble forecaster: loading, models, weighting and output.
pub use climate_forecast as forecaster;

/// Regression, outlier cleaning and order statistics.
pub use forecast_math as math;

/// Version of the workspace crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
