//! SharePoint gateway implementation.
//!
//! This module implements [`DataSourceGateway`] on top of [`SharePointClient`].

use listcal_core::RawRecord;
use tracing::{debug, info};

use crate::error::{SourceError, SourceResult};
use crate::gateway::{
    BoxFuture, ColumnInfo, DataSourceGateway, ListInfo, RecordQuery, SiteInfo,
};

use super::client::SharePointClient;
use super::config::SharePointConfig;

const GATEWAY_NAME: &str = "sharepoint";

/// Data source backed by SharePoint lists.
#[derive(Debug)]
pub struct SharePointGateway {
    config: SharePointConfig,
    client: SharePointClient,
}

impl SharePointGateway {
    /// Creates a new gateway with the given configuration.
    pub fn new(config: SharePointConfig) -> SourceResult<Self> {
        let client = SharePointClient::new(&config).map_err(|e| e.with_gateway(GATEWAY_NAME))?;
        info!(web = config.web_url_str(), "SharePoint gateway ready");
        Ok(Self { config, client })
    }

    /// Returns the site the widget is hosted on.
    pub fn web_url(&self) -> &str {
        self.config.web_url_str()
    }

    fn require_url(url: &str, what: &str) -> SourceResult<()> {
        if url.trim().is_empty() {
            return Err(SourceError::configuration(format!("{} is not set", what))
                .with_gateway(GATEWAY_NAME));
        }
        Ok(())
    }
}

impl DataSourceGateway for SharePointGateway {
    fn name(&self) -> &str {
        GATEWAY_NAME
    }

    fn list_sites(&self) -> BoxFuture<'_, SourceResult<Vec<SiteInfo>>> {
        Box::pin(async move {
            let root = self
                .client
                .root_web(self.web_url())
                .await
                .map_err(|e| e.with_gateway(GATEWAY_NAME))?;
            debug!(root = %root.url, "resolved site collection root");
            self.client
                .webs(&root.url)
                .await
                .map_err(|e| e.with_gateway(GATEWAY_NAME))
        })
    }

    fn list_titles<'a>(&'a self, site_url: &'a str) -> BoxFuture<'a, SourceResult<Vec<ListInfo>>> {
        Box::pin(async move {
            Self::require_url(site_url, "site URL")?;
            self.client
                .lists(site_url)
                .await
                .map_err(|e| e.with_gateway(GATEWAY_NAME))
        })
    }

    fn list_columns<'a>(
        &'a self,
        list_title: &'a str,
        site_url: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<ColumnInfo>>> {
        Box::pin(async move {
            Self::require_url(site_url, "site URL")?;
            Self::require_url(list_title, "list title")?;
            self.client
                .fields(list_title, site_url)
                .await
                .map_err(|e| e.with_gateway(GATEWAY_NAME))
        })
    }

    fn list_records<'a>(
        &'a self,
        query: &'a RecordQuery,
    ) -> BoxFuture<'a, SourceResult<Vec<RawRecord>>> {
        Box::pin(async move {
            Self::require_url(&query.site_url, "site URL")?;
            Self::require_url(&query.list_title, "list title")?;
            self.client
                .items(query)
                .await
                .map_err(|e| e.with_gateway(GATEWAY_NAME))
        })
    }
}
