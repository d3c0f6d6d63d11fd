//! # busbar-sf-sync-metadata
//!
//! Schema discovery and field value conversion for synchronizing Salesforce
//! with a content management system.
//!
//! ## Features
//!
//! - **Type Mapping** - Partner API field types to neutral value types
//! - **Descriptors** - Portable object and field descriptors with capability flags
//! - **Content Libraries** - Virtual schemas merged from the document and version objects
//! - **Metadata Adapter** - Session-scoped listing and description of objects and libraries
//! - **Converters** - Direction-aware date and picklist value converters
//! - **Registries** - Explicit adapter and converter registration
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_sync_metadata::{AdapterConfiguration, AdapterRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_sync_metadata::Error> {
//!     let mut registry = AdapterRegistry::new();
//!     registry.register_defaults();
//!
//!     let config = AdapterConfiguration::new("User=me@example.com;Password=secret;Token=abc")?;
//!     let mut adapter = registry.create("SalesForce", config)?;
//!
//!     let names = adapter.list_names().await?;
//!     println!("{} lists available", names.len());
//!
//!     for list in adapter.describe(&["Account", "Contact", "Marketing"]).await? {
//!         println!("{}: {} fields", list.name, list.fields.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod adapter;
mod config;
pub mod convert;
mod describe;
mod error;
mod library;
mod registry;
mod transform;
mod type_map;
mod types;

pub use adapter::{
    create_adapter, Library, MetadataAdapter, SessionState, DESCRIBE_SOBJECTS_LIMIT,
};
pub use config::{AdapterConfiguration, DiscoveredList};
pub use convert::{
    ChoiceOption, ConverterConfiguration, ConverterKind, DateConverter, Endpoint, FieldConverter,
    FieldValue, PicklistConverter,
};
pub use describe::{build_field_descriptor, build_object_descriptor, CONTENT_SIZE, SYSTEM_MODSTAMP};
pub use error::{Error, ErrorKind, Result};
pub use library::{
    LibrarySchema, CONTENT_DOCUMENT, CONTENT_VERSION, CONTENT_VERSION_FIELDS, CONTENT_WORKSPACE,
};
pub use registry::{
    AdapterFactory, AdapterRegistry, ConverterConstructor, ConverterRegistry,
    DEFAULT_ADAPTER_NAMES,
};
pub use transform::{MapCapabilities, MetadataTransform, PROVIDER};
pub use type_map::map_type;
pub use types::{FieldDescriptor, NeutralType, ObjectDescriptor, ValueType};
