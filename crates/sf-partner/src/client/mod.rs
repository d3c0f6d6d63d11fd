//! Partner SOAP API client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::connection::ConnectionSettings;
use crate::error::{Error, ErrorKind, Result};
use crate::security::xml;
use crate::transport::PartnerTransport;
use crate::types::{LoginResult, QueryRecord, RawObject, DEFAULT_API_VERSION};
use crate::PRODUCTION_LOGIN_URL;

mod describe;
mod query;
mod session;
mod xml_helpers;

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// An open Partner API session.
#[derive(Clone)]
pub(crate) struct Session {
    pub(crate) server_url: String,
    pub(crate) session_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server_url", &self.server_url)
            .field("session_id", &"[REDACTED]")
            .finish()
    }
}

/// Salesforce Partner SOAP API client.
///
/// Holds at most one session at a time. The client is not meant to be shared
/// between tasks; every session-changing call takes `&mut self`.
pub struct SoapPartnerClient {
    login_url: String,
    api_version: String,
    http_client: reqwest::Client,
    session: Option<Session>,
}

impl std::fmt::Debug for SoapPartnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapPartnerClient")
            .field("login_url", &self.login_url)
            .field("api_version", &self.api_version)
            .field(
                "server_url",
                &self.session.as_ref().map(|s| s.server_url.as_str()),
            )
            .field("session_id", &self.session.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for SoapPartnerClient {
    fn default() -> Self {
        Self::new(PRODUCTION_LOGIN_URL)
    }
}

impl SoapPartnerClient {
    /// Create a client that logs in against the given login URL.
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            http_client: reqwest::Client::new(),
            session: None,
        }
    }

    /// Create a client from parsed connection settings.
    pub fn from_settings(settings: &ConnectionSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self::new(settings.login_url())
            .with_api_version(settings.api_version())
            .with_http_client(http_client))
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns true while a session is open.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// The Partner API endpoint used for `login`.
    pub(crate) fn login_endpoint(&self) -> String {
        format!("{}/services/Soap/u/{}", self.login_url, self.api_version)
    }

    pub(crate) fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotLoggedIn))
    }

    /// Build common headers for SOAP requests.
    pub(crate) fn build_headers(&self, soap_action: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml;charset=UTF-8"),
        );
        headers.insert(
            SOAP_ACTION_HEADER.clone(),
            HeaderValue::from_static(soap_action),
        );
        headers
    }

    /// Wrap a body in a SOAP envelope, adding the session header when given.
    pub(crate) fn envelope(session_id: Option<&str>, body: &str) -> String {
        let header = match session_id {
            Some(id) => format!(
                "<soapenv:Header><urn:SessionHeader><urn:sessionId>{}</urn:sessionId></urn:SessionHeader></soapenv:Header>",
                xml::escape(id)
            ),
            None => String::new(),
        };
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:urn="urn:partner.soap.sforce.com">
  {header}
  <soapenv:Body>
    {body}
  </soapenv:Body>
</soapenv:Envelope>"#
        )
    }

    /// Post an envelope and return the response body, mapping SOAP faults to errors.
    pub(crate) async fn post_envelope(
        &self,
        url: &str,
        soap_action: &'static str,
        envelope: String,
    ) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .headers(self.build_headers(soap_action))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!(
            soap_action,
            status = status.as_u16(),
            bytes = response_text.len(),
            "Partner API response"
        );

        // Faults are delivered with HTTP 500, so look for one before the status.
        if let Some(fault) = xml_helpers::parse_soap_fault(&response_text) {
            return Err(fault.into());
        }
        if !status.is_success() {
            return Err(Error::new(ErrorKind::Http(format!(
                "status {} from {}",
                status.as_u16(),
                soap_action
            ))));
        }

        Ok(response_text)
    }

    /// Post a body on the current session.
    pub(crate) async fn call(&self, soap_action: &'static str, body: &str) -> Result<String> {
        let session = self.session()?;
        let envelope = Self::envelope(Some(&session.session_id), body);
        self.post_envelope(&session.server_url, soap_action, envelope)
            .await
    }
}

impl PartnerTransport for SoapPartnerClient {
    async fn login(&mut self, username: &str, password: &str) -> Result<LoginResult> {
        SoapPartnerClient::login(self, username, password).await
    }

    async fn logout(&mut self) -> Result<()> {
        SoapPartnerClient::logout(self).await
    }

    async fn describe_global(&self) -> Result<Vec<String>> {
        SoapPartnerClient::describe_global(self).await
    }

    async fn describe_sobjects(&self, names: &[String]) -> Result<Vec<RawObject>> {
        SoapPartnerClient::describe_sobjects(self, names).await
    }

    async fn query(&self, object: &str, fields: &[&str]) -> Result<Vec<QueryRecord>> {
        SoapPartnerClient::query(self, object, fields).await
    }
}
