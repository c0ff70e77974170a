//! In-memory data source.
//!
//! [`StaticGateway`] serves sites, lists, columns and rows held in memory. It
//! backs tests and the CLI's `--fixture` mode, where the whole source is
//! described by one JSON file:
//!
//! ```json
//! {
//!   "sites": [{ "title": "Team", "url": "https://contoso/sites/team" }],
//!   "lists": {
//!     "https://contoso/sites/team": [{
//!       "title": "Events",
//!       "id": "1",
//!       "columns": [{ "internal_name": "Title", "title": "Title" }],
//!       "records": [{ "Id": "1", "Title": "Kickoff" }]
//!     }]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use listcal_core::RawRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::record::deserialize_records;
use crate::gateway::{
    BoxFuture, ColumnInfo, DataSourceGateway, ListInfo, RecordQuery, SiteInfo,
};

const GATEWAY_NAME: &str = "static";

/// One list held by a [`StaticGateway`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticList {
    /// List title.
    pub title: String,
    /// List identifier.
    #[serde(default)]
    pub id: String,
    /// Visible columns.
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    /// Rows, already in the order the source would return them.
    #[serde(default, deserialize_with = "deserialize_records")]
    pub records: Vec<RawRecord>,
}

impl StaticList {
    /// Creates an empty list.
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder method to add a column.
    pub fn with_column(mut self, internal_name: impl Into<String>, title: impl Into<String>) -> Self {
        self.columns.push(ColumnInfo::new(internal_name, title));
        self
    }

    /// Builder method to add a row.
    pub fn with_record(mut self, record: RawRecord) -> Self {
        self.records.push(record);
        self
    }
}

/// A data source served from memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticGateway {
    /// Sites returned by `list_sites`.
    #[serde(default)]
    pub sites: Vec<SiteInfo>,
    /// Lists keyed by site URL.
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<StaticList>>,
}

impl StaticGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a gateway from a JSON fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SourceError::configuration(format!("failed to read fixture {}", path.display()))
                .with_gateway(GATEWAY_NAME)
                .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses a gateway from a JSON fixture.
    pub fn from_json(json: &str) -> SourceResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse fixture: {}", e))
                .with_gateway(GATEWAY_NAME)
        })
    }

    /// Builder method to add a site.
    pub fn with_site(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.sites.push(SiteInfo::new(title, url));
        self
    }

    /// Builder method to add a list to a site.
    pub fn with_list(mut self, site_url: impl Into<String>, list: StaticList) -> Self {
        self.lists.entry(site_url.into()).or_default().push(list);
        self
    }

    fn site_lists(&self, site_url: &str) -> SourceResult<&[StaticList]> {
        self.lists
            .get(site_url.trim_end_matches('/'))
            .or_else(|| self.lists.get(site_url))
            .map(Vec::as_slice)
            .ok_or_else(|| {
                SourceError::not_found(format!("site {} does not exist", site_url))
                    .with_gateway(GATEWAY_NAME)
            })
    }

    fn find_list(&self, list_title: &str, site_url: &str) -> SourceResult<&StaticList> {
        self.site_lists(site_url)?
            .iter()
            .find(|list| list.title.eq_ignore_ascii_case(list_title))
            .ok_or_else(|| {
                SourceError::not_found(format!("list '{}' does not exist", list_title))
                    .with_gateway(GATEWAY_NAME)
            })
    }
}

impl DataSourceGateway for StaticGateway {
    fn name(&self) -> &str {
        GATEWAY_NAME
    }

    fn list_sites(&self) -> BoxFuture<'_, SourceResult<Vec<SiteInfo>>> {
        let sites = self.sites.clone();
        Box::pin(async move { Ok(sites) })
    }

    fn list_titles<'a>(&'a self, site_url: &'a str) -> BoxFuture<'a, SourceResult<Vec<ListInfo>>> {
        Box::pin(async move {
            Ok(self
                .site_lists(site_url)?
                .iter()
                .map(|list| ListInfo::new(&list.title, &list.id))
                .collect())
        })
    }

    fn list_columns<'a>(
        &'a self,
        list_title: &'a str,
        site_url: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<ColumnInfo>>> {
        Box::pin(async move { Ok(self.find_list(list_title, site_url)?.columns.clone()) })
    }

    fn list_records<'a>(
        &'a self,
        query: &'a RecordQuery,
    ) -> BoxFuture<'a, SourceResult<Vec<RawRecord>>> {
        Box::pin(async move {
            let list = self.find_list(&query.list_title, &query.site_url)?;
            let records: Vec<RawRecord> =
                list.records.iter().take(query.row_limit).cloned().collect();
            debug!(
                list = %query.list_title,
                "serving {} of {} static records",
                records.len(),
                list.records.len()
            );
            Ok(records)
        })
    }
}
