//! Direction-aware field value converters.
//!
//! The synchronization engine calls a converter once per field per record
//! copy. A converter returning `None` leaves the destination unset; that is
//! how unparseable or absent values are reported, not as errors.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod date;
mod picklist;

pub use date::DateConverter;
pub use picklist::PicklistConverter;

/// A field value as it crosses a converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    String(String),
    /// Neutral representation of a multi-choice value.
    StringList(Vec<String>),
    /// Date/time without zone information.
    DateTime(NaiveDateTime),
    UtcDateTime(DateTime<Utc>),
    Choice(ChoiceOption),
    ChoiceList(Vec<ChoiceOption>),
    /// Anything else, passed through untouched where a rule allows it.
    Raw(serde_json::Value),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// One entry of a CMS choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The value stored for this choice; this is what Salesforce sees.
    pub persisted_value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(persisted_value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            persisted_value: persisted_value.into(),
            label: label.into(),
        }
    }
}

/// Which side of a copy a value comes from or goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Salesforce,
    Cms,
    /// Any other adapter; converters do not translate for it.
    Other,
}

/// Converter kinds known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConverterKind {
    Date,
    Picklist,
}

impl std::fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConverterKind::Date => f.write_str("Date"),
            ConverterKind::Picklist => f.write_str("Picklist"),
        }
    }
}

/// A converter as proposed on a field descriptor and persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterConfiguration {
    pub kind: ConverterKind,
    /// Encoded `Key=Value;;` payload, if the converter takes one.
    pub configuration: Option<String>,
}

impl ConverterConfiguration {
    pub fn new(kind: ConverterKind) -> Self {
        Self {
            kind,
            configuration: None,
        }
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }
}

/// A per-field value converter.
pub trait FieldConverter: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> ConverterKind;

    /// Whether [`compare`](Self::compare) is supported.
    fn can_compare(&self) -> bool;

    fn can_sort(&self) -> bool;

    /// Compare two values the way the converter would store them.
    fn compare(&self, left: Option<&FieldValue>, right: Option<&FieldValue>) -> Result<Ordering>;

    /// Convert a value read from `source` into the value to write to `destination`.
    fn convert(
        &self,
        source: Endpoint,
        destination: Endpoint,
        value: Option<&FieldValue>,
    ) -> Option<FieldValue>;

    /// The configuration this converter would be recreated from.
    fn configuration(&self) -> ConverterConfiguration;
}
