//! The widget render cycle.
//!
//! Each cycle runs: check configuration, fetch rows, project them into
//! events, hand them to the adapter. The fetch is the only step that can
//! fail; its failure becomes a terminal [`RenderState::Failed`] for the
//! cycle. Every fetch carries a [`FetchTicket`] and only the response to the
//! most recently issued ticket is applied, so a slow earlier response can
//! never overwrite a newer one.

use std::fmt::Display;

use chrono::TimeZone;
use listcal_core::{Event, FieldMappingConfig, RawRecord, project};
use listcal_providers::{DEFAULT_ROW_LIMIT, DataSourceGateway, RecordQuery, SourceResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::adapter::{
    ActivatedEvent, ActivationContext, CalendarAdapter, CalendarRenderer, RendererEvent,
    to_event_source,
};
use crate::error::{FatalError, WidgetError, WidgetResult};
use crate::panel::{DetailsPanelController, PanelView};

/// Where the calendar's rows come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocator {
    /// Chosen site URL.
    pub site: Option<String>,
    /// Whether the alternate URL is used instead of `site`.
    pub other: bool,
    /// Alternate site URL.
    pub site_other: Option<String>,
    /// Title of the list holding the events.
    pub list_title: Option<String>,
}

impl SourceLocator {
    /// Returns the site to read from: the alternate URL when enabled and
    /// set, otherwise the chosen site.
    pub fn effective_site(&self) -> Option<&str> {
        self.other
            .then(|| non_empty(&self.site_other))
            .flatten()
            .or_else(|| non_empty(&self.site))
    }

    /// Returns the list title, if set.
    pub fn list(&self) -> Option<&str> {
        non_empty(&self.list_title)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Widget settings as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Free-text description shown by the host.
    pub description: String,
    /// Stylesheet URL loaded by the host before rendering.
    pub theme: Option<String>,
    pub source: SourceLocator,
    pub fields: FieldMappingConfig,
}

impl WidgetSettings {
    /// Names every setting still needed before a fetch can run.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.source.effective_site().is_none() {
            missing.push("site");
        }
        if self.source.list().is_none() {
            missing.push("list");
        }
        missing.extend(self.fields.missing_fields());
        missing
    }

    /// Returns true when a fetch can run.
    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }

    /// Checks the settings, naming what is missing.
    pub fn validate(&self) -> WidgetResult<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WidgetError::not_configured(missing))
        }
    }
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What the host should do after [`CalendarWidget::begin_render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    /// Not configured: show the placeholder, fetch nothing.
    Placeholder,
    /// Run the query and pass the outcome to [`CalendarWidget::finish_render`].
    Fetch(FetchTicket, RecordQuery),
}

/// State of the current render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderState {
    /// Configuration incomplete.
    #[default]
    Placeholder,
    /// Waiting for the fetch behind the ticket.
    Loading(FetchTicket),
    /// Events are available.
    Ready,
    /// The fetch failed.
    Failed(FatalError),
}

/// Activation raised by the host rather than by a pointer event.
struct ProgrammaticActivation;

impl ActivationContext for ProgrammaticActivation {
    fn prevent_default(&mut self) {
        trace!("programmatic activation, nothing to prevent");
    }
}

/// One calendar widget instance.
#[derive(Debug)]
pub struct CalendarWidget {
    settings: WidgetSettings,
    adapter: CalendarAdapter,
    panel: DetailsPanelController,
    state: RenderState,
    events: Vec<Event>,
    row_limit: usize,
    issued: u64,
}

impl CalendarWidget {
    /// Creates a widget with the given settings.
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            settings,
            adapter: CalendarAdapter::new(),
            panel: DetailsPanelController::new(),
            state: RenderState::Placeholder,
            events: Vec::new(),
            row_limit: DEFAULT_ROW_LIMIT,
            issued: 0,
        }
    }

    /// Builder method to replace the adapter.
    pub fn with_adapter(mut self, adapter: CalendarAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// Builder method to set the row cap.
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Replaces the settings. Takes effect on the next render cycle.
    pub fn set_settings(&mut self, settings: WidgetSettings) {
        self.settings = settings;
    }

    pub fn adapter(&self) -> &CalendarAdapter {
        &self.adapter
    }

    pub fn panel(&self) -> &DetailsPanelController {
        &self.panel
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Events of the last successful cycle, in source order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events in the renderer's event-source shape.
    pub fn event_source(&self) -> Vec<RendererEvent> {
        to_event_source(&self.events)
    }

    /// Returns the fatal error of the current cycle, if it failed.
    pub fn fatal(&self) -> Option<&FatalError> {
        match self.state {
            RenderState::Failed(ref fatal) => Some(fatal),
            _ => None,
        }
    }

    /// Starts a render cycle.
    pub fn begin_render(&mut self) -> RenderPlan {
        self.panel.reset();

        let missing = self.settings.missing();
        if !missing.is_empty() {
            warn!(?missing, "calendar is not configured, showing placeholder");
            self.state = RenderState::Placeholder;
            self.events.clear();
            return RenderPlan::Placeholder;
        }

        let (Some(site), Some(list)) = (
            self.settings.source.effective_site(),
            self.settings.source.list(),
        ) else {
            self.state = RenderState::Placeholder;
            return RenderPlan::Placeholder;
        };

        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        let query = RecordQuery::for_mapping(list, site, &self.settings.fields)
            .with_row_limit(self.row_limit);

        debug!(ticket = ticket.0, site, list, "fetching calendar rows");
        self.state = RenderState::Loading(ticket);
        RenderPlan::Fetch(ticket, query)
    }

    /// Completes the cycle started with `ticket`.
    ///
    /// Returns false, changing nothing, when `ticket` is not the one the
    /// widget is waiting for.
    pub fn finish_render(
        &mut self,
        ticket: FetchTicket,
        result: SourceResult<Vec<RawRecord>>,
    ) -> bool {
        if self.state != RenderState::Loading(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale fetch response"
            );
            return false;
        }

        match result {
            Ok(records) => match project(&records, &self.settings.fields) {
                Some(events) => {
                    info!("loaded {} calendar events", events.len());
                    self.events = events;
                    self.state = RenderState::Ready;
                }
                None => {
                    self.events.clear();
                    self.state = RenderState::Placeholder;
                }
            },
            Err(err) => {
                error!(error = %err, "error loading list data");
                self.events.clear();
                self.state = RenderState::Failed(FatalError::fetch_failed(&err));
            }
        }
        true
    }

    /// Runs a whole cycle against `gateway`.
    pub async fn render<G>(&mut self, gateway: &G) -> &RenderState
    where
        G: DataSourceGateway + ?Sized,
    {
        if let RenderPlan::Fetch(ticket, query) = self.begin_render() {
            let result = gateway.list_records(&query).await;
            self.finish_render(ticket, result);
        }
        &self.state
    }

    /// Draws the current events. Returns false when there is nothing to draw
    /// or the container is not mounted.
    pub fn present<R: CalendarRenderer>(&self, renderer: &mut R) -> bool {
        self.state == RenderState::Ready && self.adapter.render(renderer, &self.events)
    }

    /// Opens the details panel on the event with `id`, as if it was clicked.
    pub fn select_event(&mut self, id: &str) -> WidgetResult<()> {
        let event = self
            .events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| WidgetError::UnknownEvent(id.to_string()))?;
        let activated = ActivatedEvent::from(&RendererEvent::from(event));
        self.adapter
            .on_event_activated(&activated, &mut ProgrammaticActivation, &mut self.panel);
        Ok(())
    }

    /// Closes the details panel.
    pub fn dismiss(&mut self) {
        self.panel.dismiss();
    }

    /// Panel contents with times in `tz`; `None` while the panel is closed.
    pub fn panel_view_in<Tz>(&self, tz: &Tz) -> Option<PanelView>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.panel.view_in(tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RendererOptions;
    use crate::error::FETCH_FAILED_HINT;
    use chrono::Utc;
    use listcal_providers::{FailingGateway, SourceError, StaticGateway, StaticList};

    const SITE: &str = "https://contoso.sharepoint.com/sites/team";

    fn settings() -> WidgetSettings {
        WidgetSettings {
            source: SourceLocator {
                site: Some(SITE.into()),
                list_title: Some("Events".into()),
                ..Default::default()
            },
            fields: FieldMappingConfig::new("Title", "EventDate", "EndDate", "Description", "Color"),
            ..Default::default()
        }
    }

    fn record(id: u32, title: &str) -> RawRecord {
        RawRecord::new()
            .with("Id", id.to_string())
            .with("Title", title)
            .with("EventDate", "2024-03-01 09:00:00")
            .with("EndDate", "2024-03-01 10:00:00")
            .with("Description", "<p>notes</p>")
            .with("Color", "#00f")
    }

    fn gateway() -> StaticGateway {
        StaticGateway::new().with_list(
            SITE,
            StaticList::new("Events", "1")
                .with_record(record(2, "Second"))
                .with_record(record(1, "First")),
        )
    }

    struct CountingRenderer {
        drawn: usize,
    }

    impl CalendarRenderer for CountingRenderer {
        type Container = ();

        fn find_container(&self, _id: &str) -> Option<()> {
            Some(())
        }

        fn render(&mut self, _container: (), _options: &RendererOptions, events: Vec<RendererEvent>) {
            self.drawn += events.len();
        }
    }

    #[test]
    fn effective_site_prefers_alternate() {
        let mut locator = SourceLocator {
            site: Some(SITE.into()),
            other: true,
            site_other: Some("https://fabrikam.sharepoint.com/sites/x".into()),
            list_title: None,
        };
        assert_eq!(
            locator.effective_site(),
            Some("https://fabrikam.sharepoint.com/sites/x")
        );

        locator.site_other = Some("  ".into());
        assert_eq!(locator.effective_site(), Some(SITE));

        locator.other = false;
        locator.site_other = Some("https://fabrikam.sharepoint.com/sites/x".into());
        assert_eq!(locator.effective_site(), Some(SITE));
    }

    #[test]
    fn unconfigured_renders_placeholder() {
        let mut settings = settings();
        settings.fields.color_field.clear();
        settings.source.list_title = None;
        assert_eq!(settings.missing(), vec!["list", "color"]);

        let mut widget = CalendarWidget::new(settings);
        assert_eq!(widget.begin_render(), RenderPlan::Placeholder);
        assert_eq!(widget.state(), &RenderState::Placeholder);
        assert!(matches!(
            widget.settings().validate(),
            Err(WidgetError::NotConfigured { .. })
        ));
    }

    #[test]
    fn fetch_plan_selects_mapped_columns() {
        let mut widget = CalendarWidget::new(settings()).with_row_limit(50);
        let RenderPlan::Fetch(ticket, query) = widget.begin_render() else {
            panic!("expected a fetch");
        };
        assert_eq!(ticket.sequence(), 1);
        assert_eq!(query.list_title, "Events");
        assert_eq!(query.site_url, SITE);
        assert_eq!(query.row_limit, 50);
        assert!(query.fields.contains("EventDate"));
        assert_eq!(widget.state(), &RenderState::Loading(ticket));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut widget = CalendarWidget::new(settings());
        let RenderPlan::Fetch(first, _) = widget.begin_render() else {
            panic!("expected a fetch");
        };
        let RenderPlan::Fetch(second, _) = widget.begin_render() else {
            panic!("expected a fetch");
        };

        assert!(widget.finish_render(second, Ok(vec![record(2, "Newer")])));
        assert!(!widget.finish_render(first, Ok(vec![record(1, "Older")])));

        assert_eq!(widget.state(), &RenderState::Ready);
        assert_eq!(widget.events()[0].title, "Newer");
    }

    #[test]
    fn older_response_does_not_end_loading() {
        let mut widget = CalendarWidget::new(settings());
        let RenderPlan::Fetch(first, _) = widget.begin_render() else {
            panic!("expected a fetch");
        };
        let RenderPlan::Fetch(second, _) = widget.begin_render() else {
            panic!("expected a fetch");
        };

        assert!(!widget.finish_render(first, Ok(vec![record(1, "Older")])));
        assert_eq!(widget.state(), &RenderState::Loading(second));
        assert!(widget.events().is_empty());
    }

    #[test]
    fn failure_becomes_fatal_message() {
        let mut widget = CalendarWidget::new(settings());
        let RenderPlan::Fetch(ticket, _) = widget.begin_render() else {
            panic!("expected a fetch");
        };
        let err = SourceError::not_found("list 'Events' does not exist").with_gateway("sharepoint");
        assert!(widget.finish_render(ticket, Err(err)));

        let fatal = widget.fatal().unwrap();
        assert_eq!(fatal.hint(), FETCH_FAILED_HINT);
        assert_eq!(
            fatal.details(),
            Some("[sharepoint] not_found: list 'Events' does not exist")
        );
        assert!(widget.events().is_empty());
    }

    #[tokio::test]
    async fn render_cycle_against_gateway() {
        let mut widget = CalendarWidget::new(settings());
        assert_eq!(widget.render(&gateway()).await, &RenderState::Ready);

        let titles: Vec<&str> = widget.events().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_eq!(widget.event_source()[0].background_color.as_deref(), Some("#00f"));

        let mut renderer = CountingRenderer { drawn: 0 };
        assert!(widget.present(&mut renderer));
        assert_eq!(renderer.drawn, 2);
    }

    #[tokio::test]
    async fn render_cycle_with_failing_gateway() {
        let gateway = FailingGateway::new("sharepoint", SourceError::authentication("expired"));
        let mut widget = CalendarWidget::new(settings());
        let state = widget.render(&gateway).await;
        assert!(matches!(state, RenderState::Failed(_)));
        assert!(
            widget
                .fatal()
                .unwrap()
                .to_string()
                .ends_with("Details:\n[sharepoint] authentication_failed: expired")
        );

        let mut renderer = CountingRenderer { drawn: 0 };
        assert!(!widget.present(&mut renderer));
    }

    #[tokio::test]
    async fn select_and_dismiss_event() {
        let mut widget = CalendarWidget::new(settings());
        widget.render(&gateway()).await;

        widget.select_event("1").unwrap();
        let view = widget.panel_view_in(&Utc).unwrap();
        assert_eq!(view.title, "First");
        assert_eq!(view.header_color, "#00f");
        assert_eq!(view.description_html, "<p>notes</p>");

        widget.select_event("2").unwrap();
        assert_eq!(widget.panel_view_in(&Utc).unwrap().title, "Second");

        assert!(matches!(
            widget.select_event("99"),
            Err(WidgetError::UnknownEvent(_))
        ));

        widget.dismiss();
        assert!(widget.panel_view_in(&Utc).is_none());
    }

    #[tokio::test]
    async fn new_cycle_closes_panel() {
        let mut widget = CalendarWidget::new(settings());
        widget.render(&gateway()).await;
        widget.select_event("1").unwrap();

        widget.render(&gateway()).await;
        assert!(!widget.panel().is_open());
    }

    #[test]
    fn settings_from_json() {
        let settings: WidgetSettings = serde_json::from_str(
            r#"{
                "theme": "https://cdn.example/theme.css",
                "source": { "site": "https://contoso/sites/a", "list_title": "Events" },
                "fields": { "title_field": "Title" }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.source.effective_site(), Some("https://contoso/sites/a"));
        assert_eq!(settings.missing(), vec!["start", "end", "detail", "color"]);
    }
}
