//! The transport seam used by schema discovery.

use crate::error::Result;
use crate::types::{LoginResult, QueryRecord, RawObject};

/// Calls schema discovery needs from the remote org.
///
/// A transport holds at most one session. `login` opens it and points the
/// transport at the returned server URL; `logout` closes it. Every other call
/// requires an open session.
///
/// Implemented by [`SoapPartnerClient`](crate::SoapPartnerClient); tests
/// substitute scripted transports.
#[allow(async_fn_in_trait)]
pub trait PartnerTransport {
    /// Authenticate and open a session.
    async fn login(&mut self, username: &str, password: &str) -> Result<LoginResult>;

    /// Close the current session.
    async fn logout(&mut self) -> Result<()>;

    /// Names of every SObject visible to the session user, in remote order.
    async fn describe_global(&self) -> Result<Vec<String>>;

    /// Describe the given SObjects.
    async fn describe_sobjects(&self, names: &[String]) -> Result<Vec<RawObject>>;

    /// Run `SELECT <fields> FROM <object>` and return the first batch of rows.
    async fn query(&self, object: &str, fields: &[&str]) -> Result<Vec<QueryRecord>>;
}
