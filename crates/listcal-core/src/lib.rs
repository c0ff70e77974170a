//! Core types: color normalization, field mapping, event projection, formatting

pub mod color;
pub mod event;
pub mod format;
pub mod project;
pub mod sanitize;
pub mod tracing;

pub use color::{contrasting_text_color, normalize_color, relative_luminance};
pub use event::{Event, EventDetails, EventTime, FieldMappingConfig, RawRecord};
pub use format::format_event_range;
pub use project::{parse_source_time, project, project_record};
pub use sanitize::{NO_DESCRIPTION, describe, sanitize_html};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
