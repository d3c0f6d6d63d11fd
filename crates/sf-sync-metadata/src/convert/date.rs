use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{ConverterConfiguration, ConverterKind, Endpoint, FieldConverter, FieldValue};
use crate::error::Result;

/// Offset formats accepted after RFC 3339. Salesforce writes `+0000`.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive formats accepted for date strings, tried in order after the offset forms.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Normalises date-bearing values to a date anchored at UTC midnight.
///
/// The same truncation applies in every direction. Values that carry no
/// readable date convert to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl DateConverter {
    pub fn new() -> Self {
        Self
    }

    /// The calendar date carried by a value, if any.
    ///
    /// Offsets in date strings are not applied: the date is the one written
    /// in the string.
    pub fn date_of(value: &FieldValue) -> Option<NaiveDate> {
        match value {
            FieldValue::DateTime(dt) => Some(dt.date()),
            FieldValue::UtcDateTime(dt) => Some(dt.date_naive()),
            FieldValue::String(s) => parse_date(s),
            FieldValue::Raw(serde_json::Value::String(s)) => parse_date(s),
            _ => None,
        }
    }

    fn truncate(value: &FieldValue) -> Option<DateTime<Utc>> {
        Self::date_of(value).map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    {
        return Some(dt.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

impl FieldConverter for DateConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::Date
    }

    fn can_compare(&self) -> bool {
        true
    }

    fn can_sort(&self) -> bool {
        true
    }

    fn compare(&self, left: Option<&FieldValue>, right: Option<&FieldValue>) -> Result<Ordering> {
        let left = left.and_then(Self::date_of);
        let right = right.and_then(Self::date_of);
        Ok(left.cmp(&right))
    }

    fn convert(
        &self,
        _source: Endpoint,
        _destination: Endpoint,
        value: Option<&FieldValue>,
    ) -> Option<FieldValue> {
        value
            .and_then(Self::truncate)
            .map(FieldValue::UtcDateTime)
    }

    fn configuration(&self) -> ConverterConfiguration {
        ConverterConfiguration::new(ConverterKind::Date)
    }
}
