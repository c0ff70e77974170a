//! The `events` command.

use chrono::Local;
use listcal_core::format_event_range;
use listcal_widget::{CalendarWidget, RenderState};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::source::DataSource;

/// Runs one render cycle. Returns `None` (after telling the user) when the
/// calendar is not configured yet.
pub async fn render_calendar(
    source: &DataSource,
    config: &ClientConfig,
) -> ClientResult<Option<CalendarWidget>> {
    let mut widget =
        CalendarWidget::new(config.widget_settings()).with_row_limit(config.row_limit);

    match widget.render(source.gateway()).await {
        RenderState::Ready => Ok(Some(widget)),
        RenderState::Failed(fatal) => Err(ClientError::Fatal(fatal.clone())),
        RenderState::Placeholder | RenderState::Loading(_) => {
            let missing = widget.settings().missing();
            eprintln!(
                "Calendar is not configured yet (missing: {}).",
                missing.join(", ")
            );
            eprintln!("Edit {} and run `listcal config validate`.", ClientConfig::default_path().display());
            Ok(None)
        }
    }
}

/// Prints the calendar's events.
pub async fn events(
    source: &DataSource,
    config: &ClientConfig,
    json: bool,
    limit: Option<usize>,
) -> ClientResult<()> {
    let Some(widget) = render_calendar(source, config).await? else {
        return Ok(());
    };
    let limit = limit.unwrap_or(usize::MAX);

    if json {
        let payload: Vec<_> = widget.event_source().into_iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if widget.events().is_empty() {
        println!("No events.");
        return Ok(());
    }

    for event in widget.events().iter().take(limit) {
        let when = format_event_range(&event.start, &event.end, &Local);
        let color = event
            .background_color
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        println!("{:>6}  {}  {}{}", event.id, when, event.title, color);
    }
    Ok(())
}
