//! Adapter configuration.

use std::collections::BTreeMap;

use busbar_sf_partner::ConnectionSettings;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Configuration handed to the adapter by the synchronization engine.
///
/// The connection string holds credentials; it is skipped by `Debug` and
/// never serialized.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfiguration {
    #[serde(skip)]
    connection_string: String,
    /// Lists described so far, keyed by list name.
    pub discovered: BTreeMap<String, DiscoveredList>,
}

impl std::fmt::Debug for AdapterConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfiguration")
            .field("connection_string", &"[REDACTED]")
            .field("discovered", &self.discovered)
            .finish()
    }
}

/// What the adapter learned about one described list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredList {
    pub name: String,
    /// Record id of the library, for library lists.
    pub library_id: Option<String>,
    /// Real objects the list schema was built from.
    pub source_objects: Vec<String>,
}

impl DiscoveredList {
    pub fn is_library(&self) -> bool {
        self.library_id.is_some()
    }
}

impl AdapterConfiguration {
    /// Create a configuration from a connection string.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`] when the string is empty.
    pub fn new(connection_string: impl Into<String>) -> Result<Self> {
        let connection_string = connection_string.into();
        if connection_string.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument(
                "connection string is required".to_string(),
            )));
        }
        Ok(Self {
            connection_string,
            discovered: BTreeMap::new(),
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Parse the connection string into transport settings.
    pub fn connection_settings(&self) -> Result<ConnectionSettings> {
        Ok(ConnectionSettings::parse(&self.connection_string)?)
    }

    /// Record a described list, replacing an earlier entry of the same name.
    pub(crate) fn record(&mut self, list: DiscoveredList) {
        self.discovered.insert(list.name.clone(), list);
    }
}
