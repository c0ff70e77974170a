//! Display formatting for event date ranges.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::event::EventTime;

/// Rendered in place of an unparseable endpoint.
pub const INVALID_DATE: &str = "Invalid date";

const SAME_DAY_DATE: &str = "%A, %B %-d, %Y";
const CLOCK: &str = "%-I:%M %p";
const SHORT_DATE_CLOCK: &str = "%b %-d, %-I:%M %p";

/// Formats an event's time span for the details panel.
///
/// Events that start and end on the same calendar day (in `tz`) read as
/// `"Friday, March 1, 2024 • 9:00 AM - 10:00 AM"`. Longer events read as
/// `"Mar 1, 9:00 AM - Mar 2, 10:00 AM"`.
pub fn format_event_range<Tz>(start: &EventTime, end: &EventTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start_local = start.as_datetime().map(|dt| dt.with_timezone(tz));
    let end_local = end.as_datetime().map(|dt| dt.with_timezone(tz));

    match (start_local, end_local) {
        (Some(s), Some(e)) if s.date_naive() == e.date_naive() => format!(
            "{} • {} - {}",
            s.format(SAME_DAY_DATE),
            s.format(CLOCK),
            e.format(CLOCK)
        ),
        (s, e) => format!("{} - {}", short(s.as_ref()), short(e.as_ref())),
    }
}

fn short<Tz>(dt: Option<&DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.map(|dt| dt.format(SHORT_DATE_CLOCK).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}
