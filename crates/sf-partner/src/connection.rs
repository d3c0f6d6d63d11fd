//! Connection string parsing.
//!
//! Sensitive values are redacted in Debug output.

use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::types::DEFAULT_API_VERSION;
use crate::PRODUCTION_LOGIN_URL;

/// Default timeout for Partner API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings parsed from a `Key=Value;` connection string.
///
/// Recognised keys (case-insensitive):
/// - `User` / `UserName` (required)
/// - `Password` (required)
/// - `Token` / `SecurityToken`
/// - `Url` / `LoginUrl` (default: production login URL)
/// - `ApiVersion` (default: "62.0")
/// - `Timeout` in seconds (default: 60)
///
/// Unknown keys are ignored so that connection strings shared with the
/// record-level adapter keep working.
#[derive(Clone)]
pub struct ConnectionSettings {
    username: String,
    password: String,
    security_token: Option<String>,
    login_url: String,
    api_version: String,
    timeout: Duration,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("login_url", &self.login_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectionSettings {
    /// Create settings for the given user with every optional value defaulted.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: None,
            login_url: PRODUCTION_LOGIN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Parse a connection string.
    pub fn parse(connection_string: &str) -> Result<Self> {
        let mut username = None;
        let mut password = None;
        let mut settings = Self::new("", "");

        for pair in connection_string.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            // The segment is not echoed: it may be a password fragment.
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::new(ErrorKind::Config(
                    "Malformed connection string segment (expected Key=Value)".to_string(),
                ))
            })?;
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user" | "username" => username = Some(value.to_string()),
                "password" => password = Some(value.to_string()),
                "token" | "securitytoken" => {
                    if !value.is_empty() {
                        settings.security_token = Some(value.to_string());
                    }
                }
                "url" | "loginurl" => {
                    url::Url::parse(value)?;
                    settings.login_url = value.trim_end_matches('/').to_string();
                }
                "apiversion" => settings.api_version = value.to_string(),
                "timeout" => {
                    let secs: u64 = value.parse().map_err(|_| {
                        Error::new(ErrorKind::Config(format!(
                            "Timeout must be a whole number of seconds, got '{}'",
                            value
                        )))
                    })?;
                    settings.timeout = Duration::from_secs(secs);
                }
                _ => {}
            }
        }

        settings.username = username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Config("User is required".to_string())))?;
        settings.password = password
            .ok_or_else(|| Error::new(ErrorKind::Config("Password is required".to_string())))?;

        Ok(settings)
    }

    /// Set the security token.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    /// Set the login URL.
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password sent to `login`: the password followed by the security token, if any.
    pub fn login_password(&self) -> String {
        match &self.security_token {
            Some(token) => format!("{}{}", self.password, token),
            None => self.password.clone(),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
