//! Bridge between canonical events and the calendar renderer.
//!
//! The renderer itself (month grid, list views, DOM) lives outside this
//! crate. [`CalendarAdapter`] converts [`Event`]s into the renderer's
//! event-source shape and turns the renderer's activation and mount
//! callbacks into domain actions, talking to the host only through the
//! capability traits defined here.

use std::fmt;

use chrono::{DateTime, Utc};
use listcal_core::{Event, EventDetails, EventTime};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::panel::DetailsPanelController;

/// Element id of the calendar container.
pub const CALENDAR_CONTAINER_ID: &str = "listcal-calendar";

/// Class name attached to every rendered event.
pub const EVENT_CLASS: &str = "listcal-event";

/// Accent used in list views when an event has neither color.
pub const DEFAULT_ACCENT_COLOR: &str = "#3788d8";

/// Display mode forced on every event (filled block, not a dot).
pub const BLOCK_DISPLAY: &str = "block";

/// A calendar view, as named by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKind {
    DayGridMonth,
    ListDay,
    ListWeek,
    ListMonth,
    ListYear,
    /// Any view this crate does not know about.
    Other(String),
}

impl ViewKind {
    /// Returns the renderer's name for this view.
    pub fn as_str(&self) -> &str {
        match self {
            Self::DayGridMonth => "dayGridMonth",
            Self::ListDay => "listDay",
            Self::ListWeek => "listWeek",
            Self::ListMonth => "listMonth",
            Self::ListYear => "listYear",
            Self::Other(name) => name,
        }
    }

    /// Returns true for the linear list views.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::ListDay | Self::ListWeek | Self::ListMonth | Self::ListYear
        )
    }
}

impl From<&str> for ViewKind {
    fn from(name: &str) -> Self {
        match name {
            "dayGridMonth" => Self::DayGridMonth,
            "listDay" => Self::ListDay,
            "listWeek" => Self::ListWeek,
            "listMonth" => Self::ListMonth,
            "listYear" => Self::ListYear,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ViewKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Payload kept on the renderer event for later retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtendedProps {
    pub detail: Option<String>,
}

/// One entry of the renderer's event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererEvent {
    pub id: String,
    pub title: String,
    /// `None` (serialized as `null`) when the source date was invalid.
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub display: &'static str,
    /// Omitted so the renderer applies its own default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub text_color: String,
    pub class_names: Vec<&'static str>,
    pub extended_props: ExtendedProps,
}

impl From<&Event> for RendererEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start.as_datetime(),
            end: event.end.as_datetime(),
            display: BLOCK_DISPLAY,
            background_color: event.background_color.clone(),
            border_color: event.background_color.clone(),
            text_color: event.text_color.clone(),
            class_names: vec![EVENT_CLASS],
            extended_props: ExtendedProps {
                detail: event.detail.clone(),
            },
        }
    }
}

/// Converts events 1:1 into the renderer's event source, keeping order.
pub fn to_event_source(events: &[Event]) -> Vec<RendererEvent> {
    events.iter().map(RendererEvent::from).collect()
}

/// Header toolbar layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderToolbar {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererOptions {
    pub initial_view: ViewKind,
    pub header_toolbar: HeaderToolbar,
    pub plugins: Vec<String>,
    pub event_display: String,
    pub display_event_time: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            initial_view: ViewKind::DayGridMonth,
            header_toolbar: HeaderToolbar {
                left: "prev,next today".to_string(),
                center: "title".to_string(),
                right: format!("{},{}", ViewKind::DayGridMonth, ViewKind::ListWeek),
            },
            plugins: vec!["dayGrid".to_string(), "list".to_string()],
            event_display: BLOCK_DISPLAY.to_string(),
            display_event_time: true,
        }
    }
}

/// The calendar renderer provided by the host.
pub trait CalendarRenderer {
    /// Handle to a mounted container.
    type Container;

    /// Looks up the container element; `None` if the host has not mounted it.
    fn find_container(&self, id: &str) -> Option<Self::Container>;

    /// Draws the calendar into `container`.
    fn render(
        &mut self,
        container: Self::Container,
        options: &RendererOptions,
        events: Vec<RendererEvent>,
    );
}

/// The input event that triggered an activation.
pub trait ActivationContext {
    /// Suppresses the default action (e.g. following a link).
    fn prevent_default(&mut self);
}

/// Styling access to a rendered event element.
pub trait AccentSurface {
    type Element;

    /// Draws a left-edge accent bar in `color`.
    fn apply_accent(&mut self, element: &Self::Element, color: &str);

    /// Hides the renderer's own marker glyph.
    fn hide_default_marker(&mut self, element: &Self::Element);
}

/// The renderer's view of an event the user activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedEvent {
    pub id: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub background_color: Option<String>,
    pub detail: Option<String>,
    pub url: Option<String>,
}

impl From<&RendererEvent> for ActivatedEvent {
    fn from(event: &RendererEvent) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            background_color: event.background_color.clone(),
            detail: event.extended_props.detail.clone(),
            url: None,
        }
    }
}

impl From<&ActivatedEvent> for EventDetails {
    fn from(event: &ActivatedEvent) -> Self {
        let time = |dt: Option<DateTime<Utc>>| match dt {
            Some(dt) => EventTime::At(dt),
            None => EventTime::Invalid { raw: None },
        };
        Self {
            title: event.title.clone(),
            start: time(event.start),
            end: time(event.end),
            color: event.background_color.clone(),
            description: event.detail.clone(),
            location: None,
            id: Some(event.id.clone()),
            url: event.url.clone(),
        }
    }
}

/// The renderer's view of an event that was just mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountedEvent {
    pub background_color: Option<String>,
    pub border_color: Option<String>,
}

impl MountedEvent {
    /// Resolves the accent: background, then border, then the default.
    pub fn accent_color(&self) -> &str {
        [&self.background_color, &self.border_color]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ACCENT_COLOR)
    }
}

impl From<&RendererEvent> for MountedEvent {
    fn from(event: &RendererEvent) -> Self {
        Self {
            background_color: event.background_color.clone(),
            border_color: event.border_color.clone(),
        }
    }
}

/// Renders events and routes renderer callbacks.
#[derive(Debug, Clone)]
pub struct CalendarAdapter {
    container_id: String,
    options: RendererOptions,
}

impl Default for CalendarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarAdapter {
    /// Creates an adapter with the default container and options.
    pub fn new() -> Self {
        Self {
            container_id: CALENDAR_CONTAINER_ID.to_string(),
            options: RendererOptions::default(),
        }
    }

    /// Builder method to set the container element id.
    pub fn with_container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    /// Builder method to replace the renderer options.
    pub fn with_options(mut self, options: RendererOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Renders `events`. Returns false, doing nothing, if the container is
    /// not mounted yet.
    pub fn render<R: CalendarRenderer>(&self, renderer: &mut R, events: &[Event]) -> bool {
        let Some(container) = renderer.find_container(&self.container_id) else {
            debug!(container = %self.container_id, "calendar container not mounted, skipping render");
            return false;
        };
        debug!(events = events.len(), "rendering calendar");
        renderer.render(container, &self.options, to_event_source(events));
        true
    }

    /// Handles a click/activation on a rendered event.
    pub fn on_event_activated<C: ActivationContext>(
        &self,
        event: &ActivatedEvent,
        ctx: &mut C,
        panel: &mut DetailsPanelController,
    ) {
        ctx.prevent_default();
        panel.select(EventDetails::from(event));
    }

    /// Handles an event element being mounted. Returns true if an accent was
    /// applied (list views only).
    pub fn on_event_mounted<S: AccentSurface>(
        &self,
        event: &MountedEvent,
        view: &ViewKind,
        element: &S::Element,
        surface: &mut S,
    ) -> bool {
        if !view.is_list() {
            return false;
        }
        let color = event.accent_color();
        trace!(view = %view, color, "applying list accent");
        surface.apply_accent(element, color);
        surface.hide_default_marker(element);
        true
    }
}
