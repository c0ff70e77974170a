//! Data source selection.
//!
//! The client reads from a JSON fixture when `--fixture` is given and from
//! SharePoint otherwise.

use std::path::Path;

use listcal_providers::{DataSourceGateway, StaticGateway};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// An opened data source plus the site it treats as "This Site".
pub struct DataSource {
    gateway: Box<dyn DataSourceGateway>,
    web_url: String,
}

impl DataSource {
    /// Wraps an already constructed gateway.
    pub fn new(gateway: Box<dyn DataSourceGateway>, web_url: impl Into<String>) -> Self {
        Self {
            gateway,
            web_url: web_url.into(),
        }
    }

    /// Opens the data source selected by the command line and configuration.
    pub fn open(fixture: Option<&Path>, config: &ClientConfig) -> ClientResult<Self> {
        if let Some(path) = fixture {
            return Self::from_fixture(path, config);
        }

        #[cfg(feature = "sharepoint")]
        if let Some(ref settings) = config.sharepoint {
            use listcal_providers::sharepoint::SharePointGateway;

            let gateway = SharePointGateway::new(settings.to_gateway_config()?)?;
            let web_url = gateway.web_url().to_string();
            return Ok(Self::new(Box::new(gateway), web_url));
        }

        Err(ClientError::config(
            "no data source configured: add a [sharepoint] table or pass --fixture",
        ))
    }

    fn from_fixture(path: &Path, config: &ClientConfig) -> ClientResult<Self> {
        let gateway = StaticGateway::from_file(path)?;
        let web_url = config
            .source
            .site
            .clone()
            .or_else(|| gateway.sites.first().map(|s| s.url.clone()))
            .unwrap_or_default();
        debug!(fixture = %path.display(), web = %web_url, "using fixture data source");
        Ok(Self::new(Box::new(gateway), web_url))
    }

    pub fn gateway(&self) -> &dyn DataSourceGateway {
        self.gateway.as_ref()
    }

    /// The site the calendar is hosted on.
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    pub fn into_gateway(self) -> Box<dyn DataSourceGateway> {
        self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "sites": [{ "title": "Team", "url": "https://contoso/sites/team" }],
        "lists": { "https://contoso/sites/team": [{ "title": "Events" }] }
    }"#;

    #[test]
    fn fixture_source_uses_first_site() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let source = DataSource::open(Some(&path), &ClientConfig::default()).unwrap();
        assert_eq!(source.gateway().name(), "static");
        assert_eq!(source.web_url(), "https://contoso/sites/team");
    }

    #[test]
    fn configured_site_wins_over_fixture_sites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let mut config = ClientConfig::default();
        config.source.site = Some("https://contoso/sites/home".into());
        let source = DataSource::open(Some(&path), &config).unwrap();
        assert_eq!(source.web_url(), "https://contoso/sites/home");
    }

    #[test]
    fn missing_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DataSource::open(Some(&dir.path().join("nope.json")), &ClientConfig::default());
        assert!(matches!(result, Err(ClientError::Source(_))));
    }

    #[test]
    fn no_source_configured() {
        let result = DataSource::open(None, &ClientConfig::default());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
