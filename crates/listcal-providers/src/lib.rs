//! DataSourceGateway trait and implementations.
//!
//! This crate provides the abstraction over the remote list store that backs
//! a calendar:
//!
//! - [`DataSourceGateway`] - The contract the widget consumes
//! - [`SiteInfo`], [`ListInfo`], [`ColumnInfo`] - Discovery results
//! - [`RecordQuery`] - Which rows and columns to fetch
//! - [`record`] - JSON row decoding shared by the gateways
//! - [`SourceError`] - Error types for gateway operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │ SharePoint REST  │   │  JSON fixture    │
//! └────────┬─────────┘   └────────┬─────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │SharePointGateway │   │  StaticGateway   │
//! └────────┬─────────┘   └────────┬─────────┘
//!          │                      │
//!          │  DataSourceGateway   │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │  RawRecord  │
//!              └──────┬──────┘
//!                     │
//!                     ▼ listcal_core::project()
//!              ┌─────────────┐
//!              │    Event    │
//!              └─────────────┘
//! ```

pub mod error;
pub mod gateway;
pub mod memory;
pub mod record;
#[cfg(feature = "sharepoint")]
pub mod sharepoint;

// Re-export main types at crate root
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use gateway::{
    BoxFuture, ColumnInfo, DEFAULT_ROW_LIMIT, DataSourceGateway, FailingGateway, ListInfo,
    RecordQuery, SiteInfo,
};
pub use memory::{StaticGateway, StaticList};
