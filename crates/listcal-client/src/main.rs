//! listcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use listcal_core::{TracingConfig, init_tracing};

use listcal_client::cli::{Cli, Command, ConfigAction};
use listcal_client::commands;
use listcal_client::config::ClientConfig;
use listcal_client::error::ClientResult;
use listcal_client::source::DataSource;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing_config =
        TracingConfig::for_cli(cli.debug || config.debug).with_format(config.log_format);
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let open = || DataSource::open(cli.fixture.as_deref(), &config);

    match cli.command {
        Command::Events { json, limit } => {
            commands::events::events(&open()?, &config, json, limit).await
        }
        Command::Show { ref id, json } => commands::show::show(&open()?, &config, id, json).await,
        Command::Sites => commands::sources::sites(open()?).await,
        Command::Lists { ref site } => {
            commands::sources::lists(open()?, &config, site.clone()).await
        }
        Command::Columns { ref list, ref site } => {
            commands::sources::columns(open()?, &config, list.clone(), site.clone()).await
        }
        Command::Config { ref action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
