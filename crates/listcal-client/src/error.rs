//! Client error types.

use listcal_core::TracingError;
use listcal_providers::SourceError;
use listcal_widget::{FatalError, WidgetError};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Data source error.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Widget error.
    #[error(transparent)]
    Widget(#[from] WidgetError),

    /// The render cycle ended in a user-visible failure.
    #[error("{0}")]
    Fatal(FatalError),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Logging could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        assert_eq!(
            ClientError::config("no data source").to_string(),
            "configuration error: no data source"
        );
    }

    #[test]
    fn source_error_passes_through() {
        let err: ClientError = SourceError::authentication("expired").with_gateway("sharepoint").into();
        assert_eq!(err.to_string(), "[sharepoint] authentication_failed: expired");
    }

    #[test]
    fn fatal_error_prints_whole_message() {
        let err = ClientError::Fatal(FatalError::new("could not load").with_details("boom"));
        assert_eq!(err.to_string(), "could not load\n\nDetails:\nboom");
    }
}
