//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/listcal/config.toml` by default:
//!
//! ```toml
//! log_format = "compact"
//!
//! [source]
//! site = "https://contoso.sharepoint.com/sites/home"
//! list_title = "Events"
//!
//! [fields]
//! title_field = "Title"
//! start_field = "EventDate"
//! end_field = "EndDate"
//! detail_field = "Description"
//! color_field = "Color"
//!
//! [sharepoint]
//! web_url = "https://contoso.sharepoint.com/sites/home"
//! access_token = "env::LISTCAL_TOKEN"
//! ```
//!
//! The access token supports secret references:
//! - `pass::path/in/store` - resolved via `pass show`
//! - `env::VAR_NAME` - resolved from the environment
//! - plain text - used as-is

use std::path::{Path, PathBuf};

use listcal_core::{FieldMappingConfig, TracingOutputFormat};
use listcal_providers::DEFAULT_ROW_LIMIT;
use listcal_widget::{SourceLocator, WidgetSettings};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "LISTCAL_CONFIG";

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the listcal client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Log output format.
    pub log_format: TracingOutputFormat,

    /// Maximum number of rows fetched per render.
    pub row_limit: usize,

    /// Free-text widget description.
    pub description: String,

    /// Stylesheet URL for hosts that render the calendar.
    pub theme: Option<String>,

    /// Which site and list to read.
    pub source: SourceLocator,

    /// Which columns carry which event attribute.
    pub fields: FieldMappingConfig,

    /// SharePoint connection settings.
    #[cfg(feature = "sharepoint")]
    pub sharepoint: Option<SharePointSettings>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_format: TracingOutputFormat::default(),
            row_limit: DEFAULT_ROW_LIMIT,
            description: String::new(),
            theme: None,
            source: SourceLocator::default(),
            fields: FieldMappingConfig::default(),
            #[cfg(feature = "sharepoint")]
            sharepoint: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("listcal")
    }

    /// Returns the widget settings part of this configuration.
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            description: self.description.clone(),
            theme: self.theme.clone(),
            source: self.source.clone(),
            fields: self.fields.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SharePointSettings ([sharepoint] table)
// ---------------------------------------------------------------------------

/// SharePoint connection settings.
#[cfg(feature = "sharepoint")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePointSettings {
    /// The site the calendar is hosted on ("This Site").
    pub web_url: String,

    /// Bearer token (supports `pass::` and `env::` prefixes).
    pub access_token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Overrides the HTTP user agent.
    pub user_agent: Option<String>,
}

#[cfg(feature = "sharepoint")]
fn default_timeout() -> u64 {
    listcal_providers::sharepoint::SharePointConfig::DEFAULT_TIMEOUT_SECS
}

#[cfg(feature = "sharepoint")]
impl SharePointSettings {
    /// Converts to gateway configuration, resolving the access token.
    pub fn to_gateway_config(&self) -> ClientResult<listcal_providers::sharepoint::SharePointConfig> {
        use listcal_providers::sharepoint::SharePointConfig;

        let mut config = SharePointConfig::new(&self.web_url).map_err(|e| {
            ClientError::config(format!("invalid SharePoint web_url '{}': {}", self.web_url, e))
        })?;
        config = config.with_timeout(std::time::Duration::from_secs(self.timeout));

        if let Some(ref token) = self.access_token {
            let token = crate::secret::resolve(token)?;
            if !token.trim().is_empty() {
                config = config.with_access_token(token.trim());
            }
        }
        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        Ok(config)
    }
}
