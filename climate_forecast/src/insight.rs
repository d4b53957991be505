//! Heuristic signal extraction from narrative insight text
//!
//! The narrative comes from an external text generator and is treated as
//! untrusted prose. Four independent case-insensitive detectors look for
//! trend, seasonality, volatility and forecast vocabulary. Nothing here
//! fails on odd input: text with no matches yields the default signal.

use crate::config::InsightConfig;
use crate::error::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const TREND_PATTERN: &str =
    r"\btrend(?:s|ed|ing)?\s+(upward|up|downward|down|increasing|decreasing|rising|falling|stable)\b";
const SEASONAL_PATTERN: &str = r"seasonal|cycle|pattern|weekly|daily";
const VOLATILITY_PATTERN: &str = r"volatile|unstable|fluctuat|variable|erratic";
const FORECAST_PATTERN: &str = r"forecast|predict|expect|anticipat|likely";

/// Narrated direction of the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// No trend phrase was found
    #[default]
    Unspecified,
    /// The text explicitly calls the trend stable
    Stable,
    Up,
    Down,
}

impl TrendDirection {
    /// -1, 0 or 1
    pub fn sign(&self) -> i8 {
        match self {
            TrendDirection::Up => 1,
            TrendDirection::Down => -1,
            TrendDirection::Stable | TrendDirection::Unspecified => 0,
        }
    }
}

/// Structured reading of an insight narrative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightSignal {
    pub trend_direction: TrendDirection,
    pub seasonality: bool,
    /// 0 (calm) to 1 (volatile)
    pub volatility: f64,
    /// 0 to 1, the narrator's implied certainty
    pub confidence: f64,
}

impl InsightSignal {
    /// Signal used when there is no text or nothing was detected
    pub fn neutral(config: &InsightConfig) -> Self {
        Self {
            trend_direction: TrendDirection::Unspecified,
            seasonality: false,
            volatility: config.low_volatility,
            confidence: config.default_confidence,
        }
    }
}

impl Default for InsightSignal {
    fn default() -> Self {
        Self::neutral(&InsightConfig::default())
    }
}

/// Compiled insight detectors
#[derive(Debug, Clone)]
pub struct InsightAnalyzer {
    trend: Regex,
    seasonal: Regex,
    volatility: Regex,
    forecast: Regex,
    config: InsightConfig,
}

impl InsightAnalyzer {
    /// Compile the detectors
    pub fn new(config: InsightConfig) -> Result<Self> {
        Ok(Self {
            trend: case_insensitive(TREND_PATTERN)?,
            seasonal: case_insensitive(SEASONAL_PATTERN)?,
            volatility: case_insensitive(VOLATILITY_PATTERN)?,
            forecast: case_insensitive(FORECAST_PATTERN)?,
            config,
        })
    }

    /// Run all detectors over `text`
    pub fn analyze(&self, text: &str) -> InsightSignal {
        if text.trim().is_empty() {
            return InsightSignal::neutral(&self.config);
        }

        InsightSignal {
            trend_direction: self.detect_trend(text),
            seasonality: self.mentions_seasonality(text),
            volatility: if self.mentions_volatility(text) {
                self.config.high_volatility
            } else {
                self.config.low_volatility
            },
            confidence: if self.mentions_forecast(text) {
                self.config.forecast_confidence
            } else {
                self.config.default_confidence
            },
        }
    }

    /// Read the direction out of every "trend <word>" phrase. Upward words
    /// win over downward ones, and either wins over "stable".
    pub fn detect_trend(&self, text: &str) -> TrendDirection {
        let words: Vec<String> = self
            .trend
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
            .collect();

        if contains_any(&words, &["up", "upward", "increasing", "rising"]) {
            TrendDirection::Up
        } else if contains_any(&words, &["down", "downward", "decreasing", "falling"]) {
            TrendDirection::Down
        } else if contains_any(&words, &["stable"]) {
            TrendDirection::Stable
        } else {
            TrendDirection::Unspecified
        }
    }

    pub fn mentions_seasonality(&self, text: &str) -> bool {
        self.seasonal.is_match(text)
    }

    pub fn mentions_volatility(&self, text: &str) -> bool {
        self.volatility.is_match(text)
    }

    pub fn mentions_forecast(&self, text: &str) -> bool {
        self.forecast.is_match(text)
    }

    /// Get the detection values in use
    pub fn config(&self) -> &InsightConfig {
        &self.config
    }
}

fn contains_any(words: &[String], candidates: &[&str]) -> bool {
    words.iter().any(|w| candidates.iter().any(|c| w == c))
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}
