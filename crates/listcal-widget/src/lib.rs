//! Calendar widget built on top of a list data source.
//!
//! This crate ties the pieces together:
//!
//! - [`CalendarAdapter`] - Converts events for the renderer and handles its callbacks
//! - [`DetailsPanelController`] - The selected-event panel
//! - [`config_state`] - Site/list/column selection as a state machine
//! - [`CalendarWidget`] - One render cycle after another, with stale fetches discarded

pub mod adapter;
pub mod config_state;
pub mod error;
pub mod panel;
pub mod widget;

pub use adapter::{
    AccentSurface, ActivatedEvent, ActivationContext, CalendarAdapter, CalendarRenderer,
    MountedEvent, RendererEvent, RendererOptions, ViewKind, to_event_source,
};
pub use config_state::{
    ConfigEffect, ConfigInput, ConfigResolver, ConfigStage, ConfigState, SiteChoice, SiteOption,
    Transition, resolve, site_options,
};
pub use error::{FatalError, WidgetError, WidgetResult};
pub use panel::{DetailsPanelController, PanelLink, PanelState, PanelView};
pub use widget::{
    CalendarWidget, FetchTicket, RenderPlan, RenderState, SourceLocator, WidgetSettings,
};
