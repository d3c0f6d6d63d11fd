//! Explicit registries for adapters and converters.
//!
//! The engine populates these at start-up; nothing here hooks into a host
//! application's lifecycle.

use std::collections::HashMap;

use tracing::debug;

use crate::adapter::{create_adapter, MetadataAdapter};
use crate::config::AdapterConfiguration;
use crate::convert::{
    ConverterConfiguration, ConverterKind, DateConverter, FieldConverter, PicklistConverter,
};
use crate::error::{Error, ErrorKind, Result};

/// Names the Salesforce adapter is registered under by default.
pub const DEFAULT_ADAPTER_NAMES: &[&str] = &["UIMetadata", "SalesForce"];

/// Builds an adapter from its configuration.
pub type AdapterFactory = fn(AdapterConfiguration) -> Result<MetadataAdapter>;

/// Metadata adapter factories by name.
#[derive(Debug, Default, Clone)]
pub struct AdapterRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the Salesforce adapter under its default names, keeping any
    /// factory already registered under one of them.
    pub fn register_defaults(&mut self) {
        for name in DEFAULT_ADAPTER_NAMES {
            if !self.contains(name) {
                debug!(name, "Registering Salesforce metadata adapter");
                self.register(*name, create_adapter);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Register a factory, replacing any previous one of the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: AdapterFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Create the adapter registered as `name`.
    pub fn create(&self, name: &str, config: AdapterConfiguration) -> Result<MetadataAdapter> {
        let factory = self.factories.get(name).ok_or_else(|| {
            Error::new(ErrorKind::Config(format!(
                "no metadata adapter registered as '{}'",
                name
            )))
        })?;
        factory(config)
    }
}

/// Builds a converter from its persisted configuration.
pub type ConverterConstructor = fn(&ConverterConfiguration) -> Result<Box<dyn FieldConverter>>;

/// Converter constructors by kind.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    constructors: HashMap<ConverterKind, ConverterConstructor>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register(ConverterKind::Date, date_converter);
        registry.register(ConverterKind::Picklist, picklist_converter);
        registry
    }
}

fn date_converter(_config: &ConverterConfiguration) -> Result<Box<dyn FieldConverter>> {
    Ok(Box::new(DateConverter::new()))
}

fn picklist_converter(config: &ConverterConfiguration) -> Result<Box<dyn FieldConverter>> {
    Ok(Box::new(PicklistConverter::from_configuration(config)?))
}

impl ConverterRegistry {
    /// A registry with the built-in converters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ConverterKind, constructor: ConverterConstructor) {
        self.constructors.insert(kind, constructor);
    }

    /// Instantiate the converter a field descriptor proposed.
    pub fn create(&self, config: &ConverterConfiguration) -> Result<Box<dyn FieldConverter>> {
        let constructor = self.constructors.get(&config.kind).ok_or_else(|| {
            Error::new(ErrorKind::Config(format!(
                "no converter registered for kind {}",
                config.kind
            )))
        })?;
        constructor(config)
    }
}
