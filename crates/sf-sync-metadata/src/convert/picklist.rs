use std::cmp::Ordering;

use regex_lite::Regex;

use super::{ConverterConfiguration, ConverterKind, Endpoint, FieldConverter, FieldValue};
use crate::error::{Error, ErrorKind, Result};

const CONFIGURATION_PATTERN: &str = r"IsMultiChoice=(?<IsMultiChoice>.+?);;";

/// Translates between Salesforce picklist strings and CMS choice values.
///
/// Multi-select picklists travel as `;`-separated strings on the Salesforce
/// side and as lists on the CMS side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PicklistConverter {
    multi_choice: bool,
}

impl PicklistConverter {
    pub fn new(multi_choice: bool) -> Self {
        Self { multi_choice }
    }

    /// Recreate a converter from its persisted configuration.
    ///
    /// A missing configuration or a payload without the `IsMultiChoice` key
    /// yields a single-choice converter.
    pub fn from_configuration(config: &ConverterConfiguration) -> Result<Self> {
        match config.configuration.as_deref() {
            Some(encoded) => Self::parse(encoded),
            None => Ok(Self::default()),
        }
    }

    /// Parse an encoded `IsMultiChoice=<bool>;;` payload.
    pub fn parse(encoded: &str) -> Result<Self> {
        let pattern = Regex::new(CONFIGURATION_PATTERN).map_err(|e| {
            Error::new(ErrorKind::InvalidConverterConfiguration(e.to_string()))
        })?;

        let Some(value) = pattern
            .captures(encoded)
            .and_then(|caps| caps.name("IsMultiChoice"))
        else {
            return Ok(Self::default());
        };

        let value = value.as_str().trim();
        let multi_choice = if value.eq_ignore_ascii_case("true") {
            true
        } else if value.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(Error::new(ErrorKind::InvalidConverterConfiguration(
                format!("IsMultiChoice must be True or False, got '{}'", value),
            )));
        };

        Ok(Self { multi_choice })
    }

    /// The encoded configuration payload.
    pub fn encode(multi_choice: bool) -> String {
        format!(
            "IsMultiChoice={};;",
            if multi_choice { "True" } else { "False" }
        )
    }

    pub fn is_multi_choice(&self) -> bool {
        self.multi_choice
    }

    fn salesforce_to_cms(&self, value: Option<&FieldValue>) -> Option<FieldValue> {
        let FieldValue::String(s) = value? else {
            return None;
        };
        if !self.multi_choice {
            return Some(FieldValue::String(s.clone()));
        }
        if s.is_empty() {
            return None;
        }
        Some(FieldValue::StringList(
            s.split(';')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    fn cms_to_salesforce(&self, value: Option<&FieldValue>) -> Option<FieldValue> {
        let value = value?;
        let converted = match (self.multi_choice, value) {
            (true, FieldValue::ChoiceList(choices)) => FieldValue::String(
                choices
                    .iter()
                    .map(|c| c.persisted_value.as_str())
                    .collect::<Vec<_>>()
                    .join(";"),
            ),
            (true, FieldValue::String(s)) => FieldValue::String(s.replace(',', ";")),
            (false, FieldValue::Choice(choice)) => {
                FieldValue::String(choice.persisted_value.clone())
            }
            (_, other) => other.clone(),
        };
        Some(converted)
    }
}

impl FieldConverter for PicklistConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::Picklist
    }

    fn can_compare(&self) -> bool {
        false
    }

    fn can_sort(&self) -> bool {
        false
    }

    fn compare(&self, _left: Option<&FieldValue>, _right: Option<&FieldValue>) -> Result<Ordering> {
        Err(Error::unsupported("picklist value comparison"))
    }

    fn convert(
        &self,
        source: Endpoint,
        destination: Endpoint,
        value: Option<&FieldValue>,
    ) -> Option<FieldValue> {
        match (source, destination) {
            (Endpoint::Salesforce, Endpoint::Cms) => self.salesforce_to_cms(value),
            (Endpoint::Cms, Endpoint::Salesforce) => self.cms_to_salesforce(value),
            _ => None,
        }
    }

    fn configuration(&self) -> ConverterConfiguration {
        ConverterConfiguration::new(ConverterKind::Picklist)
            .with_configuration(Self::encode(self.multi_choice))
    }
}
