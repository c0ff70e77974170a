//! SharePoint REST API client.
//!
//! This module provides a low-level HTTP client for the SharePoint REST API,
//! handling request building, status mapping and response decoding.

use listcal_core::RawRecord;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{SourceError, SourceResult};
use crate::gateway::{ColumnInfo, ListInfo, RecordQuery, SiteInfo};
use crate::record::record_from_json;

use super::config::SharePointConfig;

const ACCEPT_NOMETADATA: &str = "application/json;odata=nometadata";

/// Columns selected on every item fetch besides the mapped ones.
const ALWAYS_SELECTED: &[&str] = &["Id", "Created", "Author/ID", "Author/Title"];

const LIST_FILTER: &str = "Hidden eq false and BaseType eq 0";
const FIELD_FILTER: &str = "Hidden eq false";

/// OData collection envelope (`{"value": [...]}`).
#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WebEntry {
    title: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEntry {
    title: String,
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FieldEntry {
    internal_name: String,
    title: String,
}

/// SharePoint REST client.
pub struct SharePointClient {
    http_client: Client,
    access_token: Option<String>,
}

impl std::fmt::Debug for SharePointClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointClient")
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SharePointClient {
    /// Creates a new client from the gateway configuration.
    pub fn new(config: &SharePointConfig) -> SourceResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                SourceError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Fetches the root web of the site collection containing `web_url`.
    pub async fn root_web(&self, web_url: &str) -> SourceResult<SiteInfo> {
        let url = format!("{}/_api/Site/RootWeb?$select=Title,Url", base(web_url));
        let web: WebEntry = self.get_json(&url).await?;
        Ok(SiteInfo::new(web.title, web.url))
    }

    /// Lists the sub-sites of a web.
    pub async fn webs(&self, web_url: &str) -> SourceResult<Vec<SiteInfo>> {
        let url = format!("{}/_api/web/webs?$select=Title,Url", base(web_url));
        let webs: Collection<WebEntry> = self.get_json(&url).await?;
        Ok(webs
            .value
            .into_iter()
            .map(|w| SiteInfo::new(w.title, w.url))
            .collect())
    }

    /// Lists the visible generic lists of a site.
    pub async fn lists(&self, site_url: &str) -> SourceResult<Vec<ListInfo>> {
        let lists: Collection<ListEntry> = self.get_json(&lists_url(site_url)).await?;
        Ok(lists
            .value
            .into_iter()
            .map(|l| ListInfo::new(l.title, l.id))
            .collect())
    }

    /// Lists the visible columns of a list.
    pub async fn fields(&self, list_title: &str, site_url: &str) -> SourceResult<Vec<ColumnInfo>> {
        let fields: Collection<FieldEntry> =
            self.get_json(&fields_url(list_title, site_url)).await?;
        Ok(fields
            .value
            .into_iter()
            .map(|f| ColumnInfo::new(f.internal_name, f.title))
            .collect())
    }

    /// Fetches list items for a query.
    pub async fn items(&self, query: &RecordQuery) -> SourceResult<Vec<RawRecord>> {
        let items: Collection<Map<String, Value>> = self.get_json(&items_url(query)).await?;
        debug!(
            list = %query.list_title,
            "fetched {} items from {}",
            items.value.len(),
            query.site_url
        );
        Ok(items.value.into_iter().map(record_from_json).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        trace!(url, "GET");
        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_NOMETADATA);

        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::network("request timeout")
            } else if e.is_connect() {
                SourceError::network(format!("connection failed: {}", e))
            } else {
                SourceError::network(format!("request failed: {}", e))
            }
        })?;

        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| SourceError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse response: {}", e))
        })
    }
}

async fn check_status(response: Response) -> SourceResult<Response> {
    let status = response.status();
    match status {
        s if s.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(SourceError::authentication(
            "access token missing, expired or invalid",
        )),
        StatusCode::FORBIDDEN => Err(SourceError::authorization("access denied to site or list")),
        StatusCode::NOT_FOUND => Err(SourceError::not_found(format!(
            "{} was not found",
            response.url().path()
        ))),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(SourceError::server(format!("API error ({}): {}", status, body)))
        }
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Quotes a list title for use inside `GetByTitle('...')`.
fn list_path(list_title: &str, site_url: &str) -> String {
    format!(
        "{}/_api/web/lists/GetByTitle('{}')",
        base(site_url),
        urlencoding::encode(&list_title.replace('\'', "''"))
    )
}

fn lists_url(site_url: &str) -> String {
    format!(
        "{}/_api/web/lists?$filter={}",
        base(site_url),
        urlencoding::encode(LIST_FILTER)
    )
}

fn fields_url(list_title: &str, site_url: &str) -> String {
    format!(
        "{}/Fields?$filter={}",
        list_path(list_title, site_url),
        urlencoding::encode(FIELD_FILTER)
    )
}

fn items_url(query: &RecordQuery) -> String {
    let mut select: Vec<String> = query
        .fields
        .iter()
        .map(|f| urlencoding::encode(f).into_owned())
        .collect();
    for field in ALWAYS_SELECTED {
        if !query.fields.contains(*field) {
            select.push((*field).to_string());
        }
    }

    format!(
        "{}/items?$select={}&$expand=Author&$orderby={}&$top={}",
        list_path(&query.list_title, &query.site_url),
        select.join(","),
        urlencoding::encode("Id desc"),
        query.row_limit
    )
}
