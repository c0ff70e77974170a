//! SharePoint gateway configuration.

use std::time::Duration;

use url::Url;

/// Configuration for the SharePoint gateway.
#[derive(Clone)]
pub struct SharePointConfig {
    /// The site the widget is hosted on ("This Site").
    pub web_url: Url,

    /// Bearer token sent with every request, if any.
    pub access_token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl SharePointConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new configuration for the given site URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(web_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(web_url.as_ref().trim_end_matches('/'))?;
        Ok(Self {
            web_url: parsed,
            access_token: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("listcal/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the site URL without a trailing slash.
    pub fn web_url_str(&self) -> &str {
        self.web_url.as_str().trim_end_matches('/')
    }

    /// Returns true if a bearer token is configured.
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for SharePointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointConfig")
            .field("web_url", &self.web_url.as_str())
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
