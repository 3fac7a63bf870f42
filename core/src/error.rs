use std::fmt;
use thiserror::Error;

/// The error type for cloudsign operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request cannot be canonicalized: missing or unparseable method,
    /// path, or header values.
    MalformedRequest,

    /// A credential scope component (date, region, or service) is empty.
    InvalidScopeComponent,

    /// The secret key is empty, no signing key can be derived from it.
    InvalidSecretKey,

    /// Credentials are absent or invalid at signing time.
    CredentialInvalid,

    /// Unexpected errors (I/O, parsing, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// Convenience constructors
impl Error {
    /// Create a malformed request error.
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest, message)
    }

    /// Create an invalid scope component error.
    pub fn invalid_scope_component(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidScopeComponent, message)
    }

    /// Create an invalid secret key error.
    pub fn invalid_secret_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSecretKey, message)
    }

    /// Create a credential invalid error.
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedRequest => write!(f, "malformed request"),
            ErrorKind::InvalidScopeComponent => write!(f, "invalid scope component"),
            ErrorKind::InvalidSecretKey => write!(f, "invalid secret key"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_preserved() {
        let err = Error::invalid_secret_key("secret key is empty");
        assert_eq!(err.kind(), ErrorKind::InvalidSecretKey);
        assert_eq!(err.to_string(), "secret key is empty");
    }

    #[test]
    fn test_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::unexpected("failed to read file").with_source(io);
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(std::error::Error::source(&err).is_some());
    }
}
