//! Details panel state.
//!
//! [`DetailsPanelController`] owns the single "selected event" view. It has
//! two states, closed and open, and is mutated only by [`select`] and
//! [`dismiss`] (plus [`reset`] at the start of a render cycle).
//!
//! [`select`]: DetailsPanelController::select
//! [`dismiss`]: DetailsPanelController::dismiss
//! [`reset`]: DetailsPanelController::reset

use std::fmt::Display;

use chrono::{Local, TimeZone};
use listcal_core::{EventDetails, describe, format_event_range};
use serde::Serialize;
use tracing::debug;

/// Header color used when the event has no resolved color.
pub const DEFAULT_HEADER_COLOR: &str = "#0078d4";

/// Label of the link back to the source item.
pub const SOURCE_LINK_LABEL: &str = "Open in SharePoint";

/// The panel's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing selected.
    #[default]
    Closed,
    /// Showing an event.
    Open(EventDetails),
}

/// Everything the presentation component needs to draw an open panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub is_open: bool,
    pub title: String,
    /// Color of the strip above the title.
    pub header_color: String,
    /// Formatted date range.
    pub when: String,
    pub location: Option<String>,
    /// Sanitized HTML, or the fallback text.
    pub description_html: String,
    pub link: Option<PanelLink>,
}

/// A labelled outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelLink {
    pub label: &'static str,
    pub url: String,
}

/// Owns the selected-event view.
#[derive(Debug, Clone, Default)]
pub struct DetailsPanelController {
    state: PanelState,
}

impl DetailsPanelController {
    /// Creates a closed panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel on `event`, replacing any current selection.
    pub fn select(&mut self, event: EventDetails) {
        debug!(id = event.id.as_deref().unwrap_or_default(), "panel opened");
        self.state = PanelState::Open(event);
    }

    /// Closes the panel.
    pub fn dismiss(&mut self) {
        if self.is_open() {
            debug!("panel dismissed");
        }
        self.state = PanelState::Closed;
    }

    /// Forgets the selection at the start of a render cycle.
    pub fn reset(&mut self) {
        self.state = PanelState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    pub fn current_event(&self) -> Option<&EventDetails> {
        match self.state {
            PanelState::Open(ref event) => Some(event),
            PanelState::Closed => None,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Builds the panel contents with times shown in `tz`.
    ///
    /// Returns `None` while nothing is selected; the host must then render
    /// nothing at all rather than an empty panel.
    pub fn view_in<Tz>(&self, tz: &Tz) -> Option<PanelView>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let event = self.current_event()?;
        Some(PanelView {
            is_open: true,
            title: event.title.clone(),
            header_color: event
                .color
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_HEADER_COLOR.to_string()),
            when: format_event_range(&event.start, &event.end, tz),
            location: event.location.clone().filter(|l| !l.trim().is_empty()),
            description_html: describe(event.description.as_deref()),
            link: event.url.clone().filter(|u| !u.is_empty()).map(|url| PanelLink {
                label: SOURCE_LINK_LABEL,
                url,
            }),
        })
    }

    /// Builds the panel contents in the local time zone.
    pub fn view(&self) -> Option<PanelView> {
        self.view_in(&Local)
    }
}
