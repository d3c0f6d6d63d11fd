//! Error types for sf-partner.
//!
//! Error messages are designed to avoid exposing session ids and passwords.

use crate::types::SoapFault;

/// Result type alias for sf-partner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-partner operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns the remote fault code and message if the org answered with a SOAP fault.
    pub fn fault(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ErrorKind::Fault { code, message } => Some((code, message)),
            _ => None,
        }
    }
}

impl From<SoapFault> for Error {
    fn from(fault: SoapFault) -> Self {
        Error::new(ErrorKind::Fault {
            code: fault.fault_code,
            message: fault.fault_string,
        })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// SOAP fault returned by the org.
    #[error("SOAP fault: {code} - {message}")]
    Fault { code: String, message: String },

    /// HTTP error talking to the endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A call that needs a session was made before `login`.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Invalid input provided (e.g. an unsafe SObject name).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Partner API bodies carry the session id; never echo them back.
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if let Some(status) = err.status() {
            format!("status {}", status.as_u16())
        } else {
            err.to_string()
        };
        Error::with_source(ErrorKind::Http(message), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}
