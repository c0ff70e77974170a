//! Discovery commands: `sites`, `lists` and `columns`.

use listcal_widget::{ConfigInput, ConfigResolver};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::source::DataSource;

fn open_resolver(source: DataSource) -> ConfigResolver<Box<dyn listcal_providers::DataSourceGateway>> {
    let web_url = source.web_url().to_string();
    ConfigResolver::new(source.into_gateway(), web_url)
}

/// Picks the site from the flag, the configuration or the hosting site.
fn site_or_default(site: Option<String>, source: &DataSource, config: &ClientConfig) -> String {
    site.or_else(|| config.source.effective_site().map(str::to_string))
        .unwrap_or_else(|| source.web_url().to_string())
}

/// Prints the site dropdown.
pub async fn sites(source: DataSource) -> ClientResult<()> {
    let mut resolver = open_resolver(source);
    resolver.load_sites().await?;
    for option in resolver.site_options() {
        println!("{}\t{}", option.text, option.key);
    }
    Ok(())
}

/// Prints the lists of a site.
pub async fn lists(source: DataSource, config: &ClientConfig, site: Option<String>) -> ClientResult<()> {
    let site = site_or_default(site, &source, config);
    let mut resolver = open_resolver(source);
    let state = resolver.choose_site(&site).await?;

    if state.lists().is_empty() {
        println!("No lists on {}.", site);
    }
    for list in state.lists() {
        println!("{}\t{}", list.title, list.id);
    }
    Ok(())
}

/// Prints the columns of a list.
pub async fn columns(
    source: DataSource,
    config: &ClientConfig,
    list: Option<String>,
    site: Option<String>,
) -> ClientResult<()> {
    let list = list
        .or_else(|| config.source.list().map(str::to_string))
        .ok_or_else(|| ClientError::config("no list given: pass --list or set source.list_title"))?;
    let site = site_or_default(site, &source, config);

    let mut resolver = open_resolver(source);
    resolver.choose_site(&site).await?;
    let state = resolver.apply(ConfigInput::ListChosen(list)).await?;

    for column in state.columns() {
        println!("{}\t{}", column.internal_name, column.title);
    }
    Ok(())
}
