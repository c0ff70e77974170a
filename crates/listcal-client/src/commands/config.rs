//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    config.widget_settings().validate()?;

    #[cfg(feature = "sharepoint")]
    if let Some(ref sharepoint) = config.sharepoint {
        let gateway = sharepoint.to_gateway_config()?;
        if gateway.has_access_token() {
            println!("SharePoint access token resolved.");
        }
    }

    if config.row_limit == 0 {
        return Err(ClientError::config("row_limit must be greater than zero"));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use listcal_widget::WidgetError;

    #[test]
    fn validate_reports_missing_settings() {
        let err = validate(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Widget(WidgetError::NotConfigured { .. })));
    }

    #[test]
    fn validate_rejects_zero_row_limit() {
        let mut config = ClientConfig::parse(
            r#"
[source]
site = "https://contoso/sites/a"
list_title = "Events"

[fields]
title_field = "Title"
start_field = "EventDate"
end_field = "EndDate"
detail_field = "Description"
color_field = "Color"
"#,
        )
        .unwrap();
        assert!(validate(&config).is_ok());

        config.row_limit = 0;
        assert!(validate(&config).is_err());
    }
}
