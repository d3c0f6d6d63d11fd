use tracing::{debug, instrument};

use super::{xml_helpers, SoapPartnerClient};
use crate::error::{Error, ErrorKind, Result};
use crate::security::{soql, xml};
use crate::types::RawObject;

impl SoapPartnerClient {
    /// List the names of every SObject visible to the session user.
    #[instrument(skip(self))]
    pub async fn describe_global(&self) -> Result<Vec<String>> {
        let response = self
            .call("describeGlobal", "<urn:describeGlobal/>")
            .await?;
        let names = xml_helpers::parse_describe_global(&response);
        debug!(count = names.len(), "Described global");
        Ok(names)
    }

    /// Describe the given SObjects.
    ///
    /// Names are validated before anything is sent. Results come back in the
    /// order the server returns them.
    #[instrument(skip(self))]
    pub async fn describe_sobjects(&self, names: &[String]) -> Result<Vec<RawObject>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = names.iter().find(|n| !soql::is_safe_sobject_name(n)) {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "Invalid SObject name: {}",
                bad
            ))));
        }

        let types: String = names
            .iter()
            .map(|n| format!("<urn:sObjectType>{}</urn:sObjectType>", xml::escape(n)))
            .collect();
        let body = format!("<urn:describeSObjects>{}</urn:describeSObjects>", types);

        let response = self.call("describeSObjects", &body).await?;
        let objects = xml_helpers::parse_describe_sobjects(&response)?;
        debug!(count = objects.len(), "Described SObjects");
        Ok(objects)
    }
}
