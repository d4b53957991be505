//! Dated observations and series extraction

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compact date key used on both input and output, e.g. `20240131`
pub const DATE_FORMAT: &str = "%Y%m%d";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an 8-digit `YYYYMMDD` key, or an ISO `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) if text.len() == 8 => Ok(date),
        _ => Ok(NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)?),
    }
}

/// Format a date as a `YYYYMMDD` key
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter writing dates as `YYYYMMDD` keys
pub mod date_key {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(D::Error::custom)
    }
}

/// The `horizon` consecutive days after `last`
pub fn following_days(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::DataError(format!("Date overflow {} days after {}", offset, last))
            })
        })
        .collect()
}

/// One day of readings; a field mapped to `None` is missing, not zero
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub fields: BTreeMap<String, Option<f64>>,
}

impl Observation {
    /// Create an observation with no fields
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            fields: BTreeMap::new(),
        }
    }

    /// Add or replace a field reading
    pub fn with_field(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Present value of `field`
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied().flatten()
    }
}

/// Observations in strictly increasing date order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Create a series, rejecting out-of-order or duplicate dates
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if let Some(pair) = observations
            .windows(2)
            .find(|pair| pair[1].date <= pair[0].date)
        {
            return Err(ForecastError::DataError(format!(
                "Observation dates must be strictly increasing: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { observations })
    }

    /// Single-field series on consecutive days starting at `start`
    pub fn from_values(start: NaiveDate, field: &str, values: &[f64]) -> Result<Self> {
        let mut observations = Vec::with_capacity(values.len());
        let mut date = start;
        for (i, &value) in values.iter().enumerate() {
            if i > 0 {
                date = following_days(date, 1)?[0];
            }
            observations.push(Observation::new(date).with_field(field, Some(value)));
        }

        Self::new(observations)
    }

    /// Present values of `field` in date order; gaps are dropped
    pub fn values_for(&self, field: &str) -> Vec<f64> {
        self.observations
            .iter()
            .filter_map(|observation| observation.value(field))
            .collect()
    }

    /// Whether any observation carries `field`, present or not
    pub fn has_field(&self, field: &str) -> bool {
        self.observations
            .iter()
            .any(|observation| observation.fields.contains_key(field))
    }

    /// Every field name seen in any observation, sorted
    pub fn field_names(&self) -> Vec<String> {
        self.observations
            .iter()
            .flat_map(|observation| observation.fields.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|observation| observation.date)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Loader for daily observation tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load observations from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<ObservationSeries> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load observations from CSV text with a header row
    ///
    /// The first column is the date; every other column is a numeric field.
    /// Empty cells are missing values.
    pub fn from_reader<R: Read>(reader: R) -> Result<ObservationSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ForecastError::DataError(
                "CSV has no header row".to_string(),
            ));
        }
        let field_names: Vec<&str> = headers.iter().skip(1).collect();

        let mut observations = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let date_cell = record.get(0).unwrap_or_default();
            let mut observation = Observation::new(parse_date(date_cell)?);

            for (name, cell) in field_names.iter().zip(record.iter().skip(1)) {
                let value = if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<f64>().map_err(|_| {
                        ForecastError::DataError(format!(
                            "Row {}: '{}' is not a number in column '{}'",
                            row + 1,
                            cell,
                            name
                        ))
                    })?)
                };
                observation = observation.with_field(*name, value);
            }

            observations.push(observation);
        }

        ObservationSeries::new(observations)
    }
}
