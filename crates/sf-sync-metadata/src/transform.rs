//! Mapping capabilities and the metadata transform hook.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::types::{FieldDescriptor, ObjectDescriptor};

/// Provider name reported by this adapter.
pub const PROVIDER: &str = "SalesForce";

/// What the adapter supports when the engine builds a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCapabilities {
    /// Provider that issued these capabilities.
    pub provider: String,
    pub transform_list: bool,
    pub transform_field: bool,
    pub concurrency_field: bool,
    pub primary_key_field: bool,
    /// Field values can be compared for change detection.
    pub compare: bool,
}

impl MapCapabilities {
    /// Capabilities of the Salesforce adapter.
    pub fn salesforce() -> Self {
        Self {
            provider: PROVIDER.to_string(),
            transform_list: false,
            transform_field: false,
            concurrency_field: false,
            primary_key_field: false,
            compare: true,
        }
    }
}

/// Metadata transform for the Salesforce adapter.
///
/// None of the transform operations are implemented. Each one fails with
/// [`ErrorKind::Unsupported`] so callers never mistake it for a no-op.
#[derive(Debug, Clone)]
pub struct MetadataTransform {
    capabilities: MapCapabilities,
}

impl MetadataTransform {
    /// Create a transform for capabilities issued by this adapter.
    pub fn new(capabilities: MapCapabilities) -> Result<Self> {
        if capabilities.provider != PROVIDER {
            return Err(Error::new(ErrorKind::Config(format!(
                "metadata transform initialized with capabilities from provider '{}'",
                capabilities.provider
            ))));
        }
        Ok(Self { capabilities })
    }

    pub fn capabilities(&self) -> &MapCapabilities {
        &self.capabilities
    }

    pub fn transform_list(&self, _source: &ObjectDescriptor) -> Result<ObjectDescriptor> {
        Err(Error::unsupported("transform_list"))
    }

    pub fn transform_field(&self, _source: &FieldDescriptor) -> Result<FieldDescriptor> {
        Err(Error::unsupported("transform_field"))
    }

    /// The concurrency-control field to add to a mapped list.
    pub fn concurrency_field(&self) -> Result<FieldDescriptor> {
        Err(Error::unsupported("concurrency_field"))
    }

    /// The primary-key field to add to a mapped list.
    pub fn primary_key_field(&self) -> Result<FieldDescriptor> {
        Err(Error::unsupported("primary_key_field"))
    }
}
