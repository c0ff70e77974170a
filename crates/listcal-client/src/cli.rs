//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_ENV;

/// listcal - calendars backed by SharePoint lists
#[derive(Debug, Parser)]
#[command(name = "listcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Read sites, lists and rows from a JSON fixture instead of SharePoint
    #[arg(long, env = "LISTCAL_FIXTURE")]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the calendar's events
    Events {
        /// Print the renderer event source as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of events to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the details panel for one event
    Show {
        /// Event (row) identifier
        id: String,

        /// Print the panel contents as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sites a calendar can read from
    Sites,

    /// List the lists of a site
    Lists {
        /// Site URL (defaults to the configured site)
        #[arg(long)]
        site: Option<String>,
    },

    /// List the columns of a list
    Columns {
        /// List title (defaults to the configured list)
        #[arg(long)]
        list: Option<String>,

        /// Site URL (defaults to the configured site)
        #[arg(long)]
        site: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
