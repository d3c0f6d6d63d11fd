use tracing::{debug, instrument};

use super::{xml_helpers, SoapPartnerClient};
use crate::error::{Error, ErrorKind, Result};
use crate::security::{soql, xml};
use crate::types::QueryRecord;

impl SoapPartnerClient {
    /// Run `SELECT <fields> FROM <object>` and return the first batch of rows.
    ///
    /// Only plain identifiers are accepted for the object and field names.
    /// Further batches (`queryMore`) are not fetched.
    #[instrument(skip(self))]
    pub async fn query(&self, object: &str, fields: &[&str]) -> Result<Vec<QueryRecord>> {
        if !soql::is_safe_sobject_name(object) {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "Invalid SObject name: {}",
                object
            ))));
        }
        if fields.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "At least one field must be selected".to_string(),
            )));
        }
        if let Some(bad) = fields.iter().find(|f| !soql::is_safe_field_name(f)) {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "Invalid field name: {}",
                bad
            ))));
        }

        let soql = format!("SELECT {} FROM {}", fields.join(", "), object);
        let body = format!(
            "<urn:query><urn:queryString>{}</urn:queryString></urn:query>",
            xml::escape(&soql)
        );

        let response = self.call("query", &body).await?;
        let records = xml_helpers::parse_query_records(&response, fields);
        debug!(count = records.len(), "Query returned records");
        Ok(records)
    }
}
