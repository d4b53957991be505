//! Forecast records in the shape downstream charting expects
//!
//! Each point becomes `{"date": "YYYYMMDD", "<field>": value, "confidence": c}`,
//! keyed by the name of the field that was forecast.

use crate::data::format_date;
use crate::ensemble::ForecastPoint;
use crate::error::{ForecastError, Result};
use serde::ser::{Error as _, SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Keys every record already uses, so no field may take them
pub const RESERVED_KEYS: [&str; 2] = ["date", "confidence"];

/// Reject field names that would collide with a record's fixed keys
pub fn check_field_name(field: &str) -> Result<()> {
    if RESERVED_KEYS.contains(&field) {
        return Err(ForecastError::InvalidParameter(format!(
            "Field name '{}' collides with a record key",
            field
        )));
    }
    Ok(())
}

/// One forecast point labelled with its field name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRecord<'a> {
    pub field: &'a str,
    pub point: &'a ForecastPoint,
}

impl Serialize for ForecastRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if RESERVED_KEYS.contains(&self.field) {
            return Err(S::Error::custom(format!(
                "field name '{}' collides with a record key",
                self.field
            )));
        }
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("date", &format_date(self.point.date))?;
        map.serialize_entry(self.field, &self.point.value)?;
        map.serialize_entry("confidence", &self.point.confidence)?;
        map.end()
    }
}

/// All points of one field's forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldForecast<'a> {
    pub field: &'a str,
    pub points: &'a [ForecastPoint],
}

impl<'a> FieldForecast<'a> {
    pub fn new(field: &'a str, points: &'a [ForecastPoint]) -> Result<Self> {
        check_field_name(field)?;
        Ok(Self { field, points })
    }

    pub fn records(&self) -> impl Iterator<Item = ForecastRecord<'a>> + 'a {
        let field = self.field;
        let points: &'a [ForecastPoint] = self.points;
        points.iter().map(move |point| ForecastRecord { field, point })
    }

    /// Records as a JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for FieldForecast<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.points.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// Several fields' forecasts as one JSON object of record arrays
pub fn to_json(forecasts: &BTreeMap<String, Vec<ForecastPoint>>) -> Result<String> {
    let fields = forecasts
        .iter()
        .map(|(field, points)| Ok((field.as_str(), FieldForecast::new(field, points)?)))
        .collect::<Result<BTreeMap<&str, FieldForecast<'_>>>>()?;
    Ok(serde_json::to_string_pretty(&fields)?)
}
