//! # busbar-sf-partner
//!
//! Salesforce Partner SOAP API transport used for schema discovery.
//!
//! This crate covers only what metadata discovery needs from the remote org:
//!
//! - **Login / Logout** - Username + password (+ security token) sessions
//! - **Describe Global** - Names of every SObject visible to the user
//! - **Describe SObjects** - Field-level schema for a set of SObjects
//! - **Query** - Plain SOQL `SELECT` used to list content libraries
//!
//! Record CRUD, pagination and token refresh are intentionally absent.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_partner::{ConnectionSettings, PartnerTransport, SoapPartnerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_partner::Error> {
//!     let settings = ConnectionSettings::parse("User=me@example.com;Password=secret;Token=abc")?;
//!     let mut client = SoapPartnerClient::from_settings(&settings)?;
//!
//!     client.login(settings.username(), &settings.login_password()).await?;
//!     for name in client.describe_global().await? {
//!         println!("{name}");
//!     }
//!     client.logout().await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod connection;
mod error;
pub mod security;
mod transport;
mod types;

pub use client::SoapPartnerClient;
pub use connection::ConnectionSettings;
pub use error::{Error, ErrorKind, Result};
pub use transport::PartnerTransport;
pub use types::{
    FieldType, LoginResult, QueryRecord, RawField, RawObject, SoapFault, DEFAULT_API_VERSION,
};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
