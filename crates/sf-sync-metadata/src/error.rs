//! Error types for sf-sync-metadata.
//!
//! Messages carry the remote fault code and text but never credentials.

/// Result type alias for sf-sync-metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-sync-metadata operations.
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

    /// Shorthand for [`ErrorKind::Unsupported`].
    pub fn unsupported(operation: &str) -> Self {
        Self::new(ErrorKind::Unsupported(operation.to_string()))
    }

    /// Wrap a failed `login` call.
    pub(crate) fn login(err: busbar_sf_partner::Error) -> Self {
        let kind = match err.fault() {
            Some((code, message)) => ErrorKind::Authentication(format!(
                "Salesforce login error {} {}",
                code, message
            )),
            None => ErrorKind::Transport(err.kind.to_string()),
        };
        Self::with_source(kind, err)
    }

    /// Wrap a failed remote call made during `operation`.
    ///
    /// SOAP faults become [`ErrorKind::RemoteProtocol`]; anything else
    /// (HTTP, unreadable response) becomes [`ErrorKind::Transport`].
    pub(crate) fn remote(operation: &'static str, err: busbar_sf_partner::Error) -> Self {
        let kind = match err.fault() {
            Some((code, message)) => ErrorKind::RemoteProtocol {
                operation,
                code: code.to_string(),
                message: message.to_string(),
            },
            None => ErrorKind::Transport(err.kind.to_string()),
        };
        Self::with_source(kind, err)
    }

    /// Returns true for errors raised by credentials being rejected.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Credentials were rejected or the password has expired.
    #[error("{0}")]
    Authentication(String),

    /// The org answered a call with a SOAP fault.
    #[error("Salesforce {operation} error {code} {message}")]
    RemoteProtocol {
        operation: &'static str,
        code: String,
        message: String,
    },

    /// The call never produced a SOAP answer (HTTP failure, unreadable body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The operation is deliberately not implemented by this adapter.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted converter configuration string could not be parsed.
    #[error("Invalid converter configuration: {0}")]
    InvalidConverterConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The adapter was closed.
    #[error("Adapter is closed")]
    Closed,
}

impl From<busbar_sf_partner::Error> for Error {
    fn from(err: busbar_sf_partner::Error) -> Self {
        let kind = match &err.kind {
            busbar_sf_partner::ErrorKind::Config(msg) => ErrorKind::Config(msg.clone()),
            busbar_sf_partner::ErrorKind::InvalidInput(msg) => {
                ErrorKind::InvalidArgument(msg.clone())
            }
            other => ErrorKind::Transport(other.to_string()),
        };
        Self::with_source(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(code: &str, message: &str) -> busbar_sf_partner::Error {
        busbar_sf_partner::SoapFault {
            fault_code: code.to_string(),
            fault_string: message.to_string(),
        }
        .into()
    }

    #[test]
    fn test_login_fault_is_authentication() {
        let err = Error::login(fault("INVALID_LOGIN", "Invalid username or password"));
        assert!(err.is_authentication());
        assert_eq!(
            err.to_string(),
            "Salesforce login error INVALID_LOGIN Invalid username or password"
        );
        assert!(err.source.is_some());
    }

    #[test]
    fn test_login_http_failure_is_transport() {
        let err = Error::login(busbar_sf_partner::Error::new(
            busbar_sf_partner::ErrorKind::Http("status 503".to_string()),
        ));
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
        assert!(!err.is_authentication());
    }

    #[test]
    fn test_remote_fault_message() {
        let err = Error::remote("description", fault("sf:INVALID_SESSION_ID", "Session expired"));
        assert_eq!(
            err.to_string(),
            "Salesforce description error sf:INVALID_SESSION_ID Session expired"
        );
    }

    #[test]
    fn test_from_partner_config_error() {
        let err: Error = busbar_sf_partner::Error::new(busbar_sf_partner::ErrorKind::Config(
            "User is required".to_string(),
        ))
        .into();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
        assert!(err.to_string().contains("User is required"));
    }

    #[test]
    fn test_unsupported() {
        let err = Error::unsupported("forward_map");
        assert_eq!(err.to_string(), "Operation not supported: forward_map");
    }
}
