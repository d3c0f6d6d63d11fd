//! # busbar-sf-sync
//!
//! Salesforce schema discovery and field value translation for synchronizing
//! Salesforce with a content management system.
//!
//! ## Security
//!
//! - Passwords, security tokens and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//! - Connection string errors never echo the offending segment
//!
//! ## Crates
//!
//! - **busbar-sf-partner** - Partner SOAP API transport: login, describe, query
//! - **busbar-sf-sync-metadata** - Descriptors, content library schemas, the
//!   metadata adapter and the field value converters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_sync::{AdapterConfiguration, MetadataAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdapterConfiguration::new("User=me@example.com;Password=secret;Token=abc")?;
//!     let mut adapter = MetadataAdapter::new(config)?;
//!
//!     for name in adapter.list_names().await? {
//!         println!("{name}");
//!     }
//!
//!     let lists = adapter.describe(&["Account"]).await?;
//!     for field in &lists[0].fields {
//!         println!("{} {}", field.name, field.value_type);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export both crates for convenient access
pub use busbar_sf_partner as partner;
pub use busbar_sf_sync_metadata as metadata;

// Re-export commonly used types at the top level
pub use busbar_sf_partner::{ConnectionSettings, PartnerTransport, SoapPartnerClient};
pub use busbar_sf_sync_metadata::{
    AdapterConfiguration, AdapterRegistry, ConverterRegistry, FieldConverter, FieldValue,
    MetadataAdapter, ObjectDescriptor,
};
