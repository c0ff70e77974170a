//! Error types for data source operations.
//!
//! Only the fetch boundary can fail hard. Everything downstream of a
//! successful fetch (projection, color handling, rendering) degrades
//! per-field instead of returning errors.

use std::fmt;
use thiserror::Error;

/// The category of a data source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// Credentials were rejected (401).
    AuthenticationFailed,
    /// The caller lacks permission on the site or list (403).
    AuthorizationFailed,
    /// Connection failed, timed out or could not be resolved.
    NetworkError,
    /// The site or list does not exist (404).
    NotFound,
    /// The server answered with another non-success status.
    ServerError,
    /// The response body could not be decoded.
    InvalidResponse,
    /// The gateway was given an unusable locator or setting.
    ConfigurationError,
    /// Unexpected internal state.
    InternalError,
}

impl SourceErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while talking to a data source.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// The gateway that produced this error (e.g. "sharepoint", "static").
    gateway: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            gateway: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::AuthenticationFailed, message)
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::AuthorizationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NetworkError, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NotFound, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InternalError, message)
    }

    /// Sets the gateway name for this error.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the gateway name, if set.
    pub fn gateway(&self) -> Option<&str> {
        self.gateway.as_deref()
    }

    /// Copies code, message and gateway; the source chain is not cloneable.
    pub fn duplicate(&self) -> Self {
        let copy = Self::new(self.code, self.message.clone());
        match self.gateway {
            Some(ref gateway) => copy.with_gateway(gateway),
            None => copy,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref gateway) = self.gateway {
            write!(f, "[{}] ", gateway)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for data source operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(
            SourceErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(SourceErrorCode::NotFound.to_string(), "not_found");
    }

    #[test]
    fn error_creation() {
        let err = SourceError::not_found("list 'Events' does not exist");
        assert_eq!(err.code(), SourceErrorCode::NotFound);
        assert_eq!(err.message(), "list 'Events' does not exist");
        assert!(err.gateway().is_none());
    }

    #[test]
    fn error_display_includes_gateway() {
        let err = SourceError::network("connection reset").with_gateway("sharepoint");
        assert_eq!(err.to_string(), "[sharepoint] network_error: connection reset");
    }

    #[test]
    fn error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("socket closed");
        let err = SourceError::network("read failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn duplicate_keeps_code_and_gateway() {
        let err = SourceError::authorization("denied")
            .with_gateway("static")
            .with_source(std::io::Error::other("x"));
        let copy = err.duplicate();
        assert_eq!(copy.code(), SourceErrorCode::AuthorizationFailed);
        assert_eq!(copy.gateway(), Some("static"));
        assert_eq!(copy.to_string(), err.to_string());
    }
}
