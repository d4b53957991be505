//! Autoregressive model on differenced data
//!
//! A fixed-order (p, d) simplification of ARIMA. The MA order is carried so
//! callers can describe the model, but it takes no part in fitting.

use crate::config::{ArEstimator, ArimaConfig};
use crate::error::{ForecastError, Result};
use crate::models::{require_data, ForecastModel, ForecastResult, TrainedForecastModel};
use forecast_math::statistics::{difference, integrate};
use forecast_math::{linalg, MathError};
use log::{debug, warn};

/// ARIMA-style model (AutoRegressive on Integrated data)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// How the AR coefficients are estimated
    estimator: ArEstimator,
}

/// Trained ARIMA-style model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Fitted AR coefficients, lag 1 first
    ar_coefficients: Vec<f64>,
    /// Series after `d` rounds of differencing
    differenced: Vec<f64>,
    /// Last value of each differencing level, original series first
    anchors: Vec<f64>,
    /// Last observed value of the original series
    last_value: f64,
    /// False when there was too little differenced data to fit
    fitted: bool,
}

impl ArimaModel {
    /// Create a new model with the per-feature estimator
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p == 0 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            estimator: ArEstimator::PerFeature,
        })
    }

    /// Create a model from its configuration section
    pub fn from_config(config: &ArimaConfig) -> Result<Self> {
        Ok(Self::new(config.p, config.d, config.q)?.with_estimator(config.estimator))
    }

    /// Select the coefficient estimator
    pub fn with_estimator(mut self, estimator: ArEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn estimator(&self) -> ArEstimator {
        self.estimator
    }

    /// Design rows of the p preceding differenced values (lag 1 first) and
    /// the value each row should predict
    fn design(&self, differenced: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.p..differenced.len())
            .map(|i| {
                let row = (1..=self.p).map(|lag| differenced[i - lag]).collect();
                (row, differenced[i])
            })
            .unzip()
    }

    /// Fit each coefficient on its own lag: `sum(x*y) / sum(x^2)`
    fn per_feature(rows: &[Vec<f64>], targets: &[f64], p: usize) -> Vec<f64> {
        (0..p)
            .map(|lag| {
                let (num, den) = rows
                    .iter()
                    .zip(targets)
                    .fold((0.0, 0.0), |(num, den), (row, y)| {
                        (num + row[lag] * y, den + row[lag] * row[lag])
                    });
                if den > 0.0 {
                    num / den
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Solve the normal equations `X'X c = X'y`
    fn joint(
        rows: &[Vec<f64>],
        targets: &[f64],
        p: usize,
    ) -> std::result::Result<Vec<f64>, MathError> {
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, y) in rows.iter().zip(targets) {
            for i in 0..p {
                xty[i] += row[i] * y;
                for j in 0..p {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        linalg::solve(xtx, xty)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &[f64]) -> Result<TrainedArimaModel> {
        require_data(series, &self.name)?;

        let last_value = series[series.len() - 1];
        let mut anchors = Vec::with_capacity(self.d);
        let mut level = series.to_vec();
        for _ in 0..self.d {
            if let Some(&last) = level.last() {
                anchors.push(last);
            }
            level = difference(&level, 1);
        }
        let differenced = level;

        if differenced.len() < self.p + 1 {
            debug!(
                "{}: {} differenced points, too few to fit; forecasting flat",
                self.name,
                differenced.len()
            );
            return Ok(TrainedArimaModel {
                name: self.name.clone(),
                ar_coefficients: vec![0.0; self.p],
                differenced,
                anchors,
                last_value,
                fitted: false,
            });
        }

        let (rows, targets) = self.design(&differenced);
        let ar_coefficients = match self.estimator {
            ArEstimator::PerFeature => Self::per_feature(&rows, &targets, self.p),
            ArEstimator::Joint => match Self::joint(&rows, &targets, self.p) {
                Ok(coefficients) => coefficients,
                Err(err) => {
                    warn!(
                        "{}: joint AR fit failed ({}), using per-feature estimates",
                        self.name, err
                    );
                    Self::per_feature(&rows, &targets, self.p)
                }
            },
        };
        debug!("{}: coefficients {:?}", self.name, ar_coefficients);

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            ar_coefficients,
            differenced,
            anchors,
            last_value,
            fitted: true,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Fitted AR coefficients, lag 1 first
    pub fn coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Whether there was enough data to fit the coefficients
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Iterate the AR recursion on the differenced scale
    fn forecast_differences(&self, horizon: usize) -> Vec<f64> {
        let p = self.ar_coefficients.len();
        let mut history = self.differenced[self.differenced.len() - p..].to_vec();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let prediction: f64 = self
                .ar_coefficients
                .iter()
                .enumerate()
                .map(|(lag, coefficient)| coefficient * history[history.len() - 1 - lag])
                .sum();
            history.push(prediction);
            forecasts.push(prediction);
        }

        forecasts
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if !self.fitted {
            return ForecastResult::new(vec![self.last_value; horizon], horizon);
        }

        // Undo each differencing level, innermost first.
        let values = self
            .anchors
            .iter()
            .rev()
            .fold(self.forecast_differences(horizon), |diffs, &anchor| {
                integrate(anchor, &diffs)
            });

        ForecastResult::new(values, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
