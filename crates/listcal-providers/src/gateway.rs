//! DataSourceGateway trait definition.
//!
//! This module defines [`DataSourceGateway`], the abstraction over the remote
//! list store that backs a calendar. The widget only ever consumes this
//! contract: it discovers sites, lists and columns while being configured,
//! then pulls rows for the chosen list on every render cycle.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use listcal_core::{FieldMappingConfig, RawRecord};
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// Row cap applied to every record fetch.
pub const DEFAULT_ROW_LIMIT: usize = 500;

/// A site (web) that can host lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Display title.
    pub title: String,
    /// Absolute URL of the site.
    pub url: String,
}

impl SiteInfo {
    /// Creates a new site entry.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A list on a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Display title, also used to address the list.
    pub title: String,
    /// Source-assigned identifier.
    pub id: String,
}

impl ListInfo {
    /// Creates a new list entry.
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
        }
    }
}

/// A column of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Name used in queries and as the key in [`RawRecord`]s.
    pub internal_name: String,
    /// Display title.
    pub title: String,
}

impl ColumnInfo {
    /// Creates a new column entry.
    pub fn new(internal_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            title: title.into(),
        }
    }
}

/// Parameters for fetching rows of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// Title of the list to read.
    pub list_title: String,
    /// Site hosting the list.
    pub site_url: String,
    /// Columns to select.
    pub fields: BTreeSet<String>,
    /// Maximum number of rows to return.
    pub row_limit: usize,
}

impl RecordQuery {
    /// Creates a query with no selected columns and the default row cap.
    pub fn new(list_title: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            list_title: list_title.into(),
            site_url: site_url.into(),
            fields: BTreeSet::new(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Creates a query selecting every mapped column.
    pub fn for_mapping(
        list_title: impl Into<String>,
        site_url: impl Into<String>,
        mapping: &FieldMappingConfig,
    ) -> Self {
        let mut query = Self::new(list_title, site_url);
        query.fields = mapping
            .columns()
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        query
    }

    /// Builder method to add a selected column.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    /// Builder method to set the row cap.
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so hosts can hold a
/// `Box<dyn DataSourceGateway>` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The remote list store backing a calendar.
///
/// # Implementation Notes
///
/// - `list_records` returns rows newest first (descending by the source's
///   internal identifier) and never more than `query.row_limit` of them.
/// - Values are returned as text; `null` columns are `None`.
/// - Implementations must not retry; failures surface to the render cycle.
pub trait DataSourceGateway: Send + Sync {
    /// Returns the name of this gateway (e.g. "sharepoint", "static").
    fn name(&self) -> &str;

    /// Lists the sites a calendar may read from.
    fn list_sites(&self) -> BoxFuture<'_, SourceResult<Vec<SiteInfo>>>;

    /// Lists the visible generic lists on a site.
    fn list_titles<'a>(&'a self, site_url: &'a str) -> BoxFuture<'a, SourceResult<Vec<ListInfo>>>;

    /// Lists the visible columns of a list.
    fn list_columns<'a>(
        &'a self,
        list_title: &'a str,
        site_url: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<ColumnInfo>>>;

    /// Fetches rows of a list.
    fn list_records<'a>(&'a self, query: &'a RecordQuery)
    -> BoxFuture<'a, SourceResult<Vec<RawRecord>>>;
}

impl<T: DataSourceGateway + ?Sized> DataSourceGateway for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_sites(&self) -> BoxFuture<'_, SourceResult<Vec<SiteInfo>>> {
        (**self).list_sites()
    }

    fn list_titles<'a>(&'a self, site_url: &'a str) -> BoxFuture<'a, SourceResult<Vec<ListInfo>>> {
        (**self).list_titles(site_url)
    }

    fn list_columns<'a>(
        &'a self,
        list_title: &'a str,
        site_url: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<ColumnInfo>>> {
        (**self).list_columns(list_title, site_url)
    }

    fn list_records<'a>(
        &'a self,
        query: &'a RecordQuery,
    ) -> BoxFuture<'a, SourceResult<Vec<RawRecord>>> {
        (**self).list_records(query)
    }
}

/// A gateway that always fails.
///
/// Stands in for a source that could not be constructed, so the widget can
/// still run its cycle and show the failure to the user.
#[derive(Debug)]
pub struct FailingGateway {
    name: String,
    error: SourceError,
}

impl FailingGateway {
    /// Creates a new failing gateway.
    pub fn new(name: impl Into<String>, error: SourceError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    fn fail<T: Send + 'static>(&self) -> BoxFuture<'_, SourceResult<T>> {
        let error = self.error.duplicate().with_gateway(&self.name);
        Box::pin(async move { Err(error) })
    }
}

impl DataSourceGateway for FailingGateway {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_sites(&self) -> BoxFuture<'_, SourceResult<Vec<SiteInfo>>> {
        self.fail()
    }

    fn list_titles<'a>(&'a self, _site_url: &'a str) -> BoxFuture<'a, SourceResult<Vec<ListInfo>>> {
        self.fail()
    }

    fn list_columns<'a>(
        &'a self,
        _list_title: &'a str,
        _site_url: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<ColumnInfo>>> {
        self.fail()
    }

    fn list_records<'a>(
        &'a self,
        _query: &'a RecordQuery,
    ) -> BoxFuture<'a, SourceResult<Vec<RawRecord>>> {
        self.fail()
    }
}
