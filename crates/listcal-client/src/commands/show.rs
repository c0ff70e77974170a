//! The `show` command.

use chrono::Local;

use crate::commands::events::render_calendar;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::source::DataSource;

/// Prints the details panel for one event.
pub async fn show(source: &DataSource, config: &ClientConfig, id: &str, json: bool) -> ClientResult<()> {
    let Some(mut widget) = render_calendar(source, config).await? else {
        return Ok(());
    };
    widget.select_event(id)?;

    let Some(view) = widget.panel_view_in(&Local) else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.title);
    println!("{}", view.when);
    if let Some(ref location) = view.location {
        println!("Location: {}", location);
    }
    println!("Color: {}", view.header_color);
    println!();
    println!("{}", view.description_html);
    if let Some(ref link) = view.link {
        println!();
        println!("{}: {}", link.label, link.url);
    }
    Ok(())
}
