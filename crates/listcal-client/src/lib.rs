//! CLI, configuration and data source wiring.
//!
//! This crate provides the `listcal` command-line interface, a terminal host
//! for the calendar widget.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;
pub mod source;

pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use source::DataSource;
