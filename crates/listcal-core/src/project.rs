//! RawRecord to Event projection pipeline.
//!
//! This module turns data-source rows into canonical [`Event`]s using a
//! [`FieldMappingConfig`]. Projection never fails: missing columns become
//! empty values, bad dates become [`EventTime::Invalid`] and bad colors become
//! "no override". Rows are never dropped or re-ordered.
//!
//! The projection process for each row:
//! 1. Looks up the five mapped columns and the row identifier
//! 2. Parses start/end from the source date format (UTC)
//! 3. Normalizes the color and derives the text color

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::color::{contrasting_text_color, normalize_color};
use crate::event::{Event, EventTime, FieldMappingConfig, RawRecord};

/// The date-time format lists hand back, interpreted as UTC.
pub const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Projects every record into an [`Event`], preserving order.
///
/// Returns `None` when the mapping is incomplete; callers treat that as
/// "not configured yet" rather than as an error.
pub fn project(records: &[RawRecord], config: &FieldMappingConfig) -> Option<Vec<Event>> {
    let missing = config.missing_fields();
    if !missing.is_empty() {
        debug!(?missing, "field mapping incomplete, skipping projection");
        return None;
    }

    let events: Vec<Event> = records
        .iter()
        .map(|record| project_record(record, config))
        .collect();

    debug!("projected {} records into events", events.len());
    Some(events)
}

/// Projects a single record.
///
/// Does not check that the mapping is complete; unset column names simply
/// look up nothing.
pub fn project_record(record: &RawRecord, config: &FieldMappingConfig) -> Event {
    let id = record.id().to_string();
    let title = record
        .get(&config.title_field)
        .unwrap_or_default()
        .to_string();

    let start = parse_source_time(record.get(&config.start_field));
    let end = parse_source_time(record.get(&config.end_field));

    if start.is_invalid() || end.is_invalid() {
        warn!(id = %id, "record has an unparseable start or end date");
    }

    let raw_color = record.get(&config.color_field).map(str::to_string);
    let background_color = normalize_color(raw_color.as_deref());
    let text_color = contrasting_text_color(background_color.as_deref()).to_string();

    let event = Event {
        id,
        title,
        start,
        end,
        detail: record.get(&config.detail_field).map(str::to_string),
        raw_color,
        background_color,
        text_color,
    };

    if event.has_inverted_range() {
        warn!(id = %event.id, "event ends before it starts");
    }

    event
}

/// Parses a source date-time value as UTC.
///
/// The canonical source format is `YYYY-MM-DD HH:mm:ss`. The ISO `T`
/// separator, fractional seconds, RFC 3339 offsets and bare dates
/// (midnight UTC) are accepted as well. An offset is ignored: the wall-clock
/// time is read as UTC. Anything else, including a missing
/// value, yields [`EventTime::Invalid`].
pub fn parse_source_time(value: Option<&str>) -> EventTime {
    let Some(raw) = value else {
        return EventTime::Invalid { raw: None };
    };

    let text = raw.trim();
    parse_utc(text)
        .map(EventTime::At)
        .unwrap_or_else(|| EventTime::Invalid {
            raw: Some(raw.to_string()),
        })
}

fn parse_utc(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local().and_utc());
    }

    for format in [SOURCE_DATE_FORMAT, ISO_DATE_FORMAT] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mapping() -> FieldMappingConfig {
        FieldMappingConfig::new("Title", "Start", "End", "Detail", "Color")
    }

    fn team_sync() -> RawRecord {
        RawRecord::new()
            .with("Id", "12")
            .with("Title", "Team Sync")
            .with("Start", "2024-03-01 09:00:00")
            .with("End", "2024-03-01 10:00:00")
            .with("Detail", "<b>hi</b>")
            .with("Color", "ff0000")
    }

    #[test]
    fn projects_a_complete_record() {
        let events = project(&[team_sync()], &mapping()).unwrap();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.id, "12");
        assert_eq!(event.title, "Team Sync");
        assert_eq!(
            event.start,
            EventTime::At(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
        );
        assert_eq!(
            event.end,
            EventTime::At(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(event.detail.as_deref(), Some("<b>hi</b>"));
        assert_eq!(event.raw_color.as_deref(), Some("ff0000"));
        assert_eq!(event.background_color.as_deref(), Some("#ff0000"));
        assert_eq!(event.text_color, "#fff");
    }

    #[test]
    fn incomplete_mapping_skips_projection() {
        let config = FieldMappingConfig {
            color_field: String::new(),
            ..mapping()
        };
        assert!(project(&[team_sync()], &config).is_none());
    }

    #[test]
    fn missing_columns_are_surfaced_not_dropped() {
        let sparse = RawRecord::new().with("Id", "3");
        let events = project(&[sparse], &mapping()).unwrap();
        let event = &events[0];

        assert_eq!(event.title, "");
        assert_eq!(event.start, EventTime::Invalid { raw: None });
        assert_eq!(event.end, EventTime::Invalid { raw: None });
        assert!(event.detail.is_none());
        assert!(event.raw_color.is_none());
        assert!(event.background_color.is_none());
        assert_eq!(event.text_color, "#000");
    }

    #[test]
    fn bad_color_means_no_override() {
        let record = team_sync().with("Color", "not-a-color");
        let event = project_record(&record, &mapping());
        assert_eq!(event.raw_color.as_deref(), Some("not-a-color"));
        assert!(event.background_color.is_none());
        assert_eq!(event.text_color, "#000");
    }

    #[test]
    fn rgb_color_keeps_dark_text() {
        let record = team_sync().with("Color", "0,0,0");
        let event = project_record(&record, &mapping());
        assert_eq!(event.background_color.as_deref(), Some("rgb(0,0,0)"));
        assert_eq!(event.text_color, "#000");
    }

    #[test]
    fn order_is_preserved() {
        let records: Vec<RawRecord> = ["30", "10", "20"]
            .iter()
            .map(|id| team_sync().with("Id", *id))
            .collect();
        let ids: Vec<String> = project(&records, &mapping())
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
    }

    #[test]
    fn projection_is_repeatable() {
        let records = vec![team_sync(), RawRecord::new().with("Title", "Other")];
        assert_eq!(project(&records, &mapping()), project(&records, &mapping()));
    }

    #[test]
    fn inverted_range_is_kept() {
        let record = team_sync()
            .with("Start", "2024-03-02 09:00:00")
            .with("End", "2024-03-01 09:00:00");
        let event = project_record(&record, &mapping());
        assert!(event.has_inverted_range());
    }

    #[test]
    fn parses_source_format() {
        let expected = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(parse_source_time(Some("2024-12-31 23:59:58")), EventTime::At(expected));
        assert_eq!(parse_source_time(Some(" 2024-12-31 23:59:58 ")), EventTime::At(expected));
    }

    #[test]
    fn parses_iso_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(parse_source_time(Some("2024-03-01T09:00:00Z")), EventTime::At(expected));
        assert_eq!(parse_source_time(Some("2024-03-01T09:00:00+00:00")), EventTime::At(expected));
        assert_eq!(parse_source_time(Some("2024-03-01T09:00:00")), EventTime::At(expected));
    }

    #[test]
    fn offsets_do_not_shift_wall_clock_time() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_source_time(Some("2024-03-01T10:00:00+01:00")), EventTime::At(expected));
        assert_eq!(parse_source_time(Some("2024-03-01T10:00:00-05:00")), EventTime::At(expected));
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_source_time(Some("2024-03-01")), EventTime::At(expected));
    }

    #[test]
    fn garbage_dates_become_invalid() {
        assert_eq!(
            parse_source_time(Some("next tuesday")),
            EventTime::Invalid { raw: Some("next tuesday".into()) }
        );
        assert_eq!(
            parse_source_time(Some("2024-02-30 09:00:00")),
            EventTime::Invalid { raw: Some("2024-02-30 09:00:00".into()) }
        );
        assert_eq!(parse_source_time(Some("")), EventTime::Invalid { raw: Some(String::new()) });
        assert_eq!(parse_source_time(None), EventTime::Invalid { raw: None });
    }
}
