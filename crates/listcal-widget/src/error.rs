//! Error types for the widget.

use std::fmt;

use listcal_providers::SourceError;
use thiserror::Error;

/// Shown above the diagnostic details when a fetch fails.
pub const FETCH_FAILED_HINT: &str = "There was an error loading your list. Verify the selected list has Calendar Events or choose a new list.";

/// Errors raised by the widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// One or more field mappings or the list locator is unset.
    #[error("calendar is not configured (missing: {})", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },

    /// The data source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// No rendered event has the given identifier.
    #[error("no event with id '{0}' is rendered")]
    UnknownEvent(String),
}

impl WidgetError {
    /// Creates a not-configured error.
    pub fn not_configured(missing: Vec<&'static str>) -> Self {
        Self::NotConfigured { missing }
    }
}

/// A terminal, user-visible failure of one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    hint: String,
    details: Option<String>,
}

impl FatalError {
    /// Creates a fatal error with only a user message.
    pub fn new(hint: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            details: None,
        }
    }

    /// Creates the fatal error shown when fetching records failed.
    pub fn fetch_failed(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(FETCH_FAILED_HINT).with_details(error_chain(err))
    }

    /// Builder method to attach diagnostic details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = (!details.is_empty()).then_some(details);
        self
    }

    /// Returns the remediation hint.
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Returns the diagnostic details, if any.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(f, "{}\n\nDetails:\n{}", self.hint, details),
            None => f.write_str(&self.hint),
        }
    }
}

/// Renders an error and its sources, one per line.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

/// A specialized Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
