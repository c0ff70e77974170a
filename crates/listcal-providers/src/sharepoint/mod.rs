//! SharePoint REST gateway.
//!
//! This module provides [`SharePointGateway`], which reads sites, lists,
//! columns and list items through the SharePoint REST API (`/_api/...`)
//! using OData `nometadata` JSON.
//!
//! # Features
//!
//! - Site discovery from the site collection's root web
//! - Visible generic lists only (`Hidden eq false and BaseType eq 0`)
//! - Item fetch newest first, capped at the query's row limit
//! - Expanded lookup columns flattened to `Parent/Child` keys
//!
//! Authentication flows are out of scope: an already-issued bearer token can
//! be supplied, otherwise requests go out anonymously (useful behind a
//! proxy that adds credentials).
//!
//! # Example
//!
//! ```ignore
//! use listcal_providers::sharepoint::{SharePointConfig, SharePointGateway};
//!
//! let config = SharePointConfig::new("https://contoso.sharepoint.com/sites/team")?
//!     .with_access_token(token);
//! let gateway = SharePointGateway::new(config)?;
//! let lists = gateway.list_titles(gateway.web_url()).await?;
//! ```

mod client;
mod config;
mod gateway;

pub use client::SharePointClient;
pub use crate::record::record_from_json;
pub use config::SharePointConfig;
pub use gateway::SharePointGateway;
