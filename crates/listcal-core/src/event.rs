//! Event types for list-backed calendars.
//!
//! This module provides the data that flows through the projection pipeline:
//! - [`RawRecord`]: One row from the data source, keyed by column name
//! - [`FieldMappingConfig`]: Which columns carry which event attribute
//! - [`EventTime`]: A parsed date-time, or the invalid-date sentinel
//! - [`Event`]: The canonical, renderer-agnostic calendar entry
//! - [`EventDetails`]: The payload handed to the details panel

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column holding the stable row identifier.
pub const ID_FIELD: &str = "Id";

/// Alternate spelling of [`ID_FIELD`] returned by some list endpoints.
pub const ID_FIELD_ALT: &str = "ID";

/// One row from the data source.
///
/// No shape is assumed beyond string-keyed lookup. A column that is present
/// with a `null` value and a column that is absent are treated the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a column value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, Some(value.into()));
        self
    }

    /// Builder method to set a column to null.
    pub fn with_null(mut self, field: impl Into<String>) -> Self {
        self.insert(field, None);
        self
    }

    /// Sets a column value.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        self.fields.insert(field.into(), value);
    }

    /// Looks up a column value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Returns the row identifier, or an empty string if the row has none.
    pub fn id(&self) -> &str {
        self.get(ID_FIELD)
            .or_else(|| self.get(ID_FIELD_ALT))
            .unwrap_or_default()
    }

    /// Returns the number of columns in this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<Option<String>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Maps logical event attributes onto source column names.
///
/// All five names must be set before projection can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMappingConfig {
    /// Column holding the event title.
    pub title_field: String,
    /// Column holding the start date-time.
    pub start_field: String,
    /// Column holding the end date-time.
    pub end_field: String,
    /// Column holding the (possibly HTML) description.
    pub detail_field: String,
    /// Column holding the free-text color.
    pub color_field: String,
}

impl FieldMappingConfig {
    /// Creates a mapping from the five column names.
    pub fn new(
        title_field: impl Into<String>,
        start_field: impl Into<String>,
        end_field: impl Into<String>,
        detail_field: impl Into<String>,
        color_field: impl Into<String>,
    ) -> Self {
        Self {
            title_field: title_field.into(),
            start_field: start_field.into(),
            end_field: end_field.into(),
            detail_field: detail_field.into(),
            color_field: color_field.into(),
        }
    }

    /// Lists the logical names of every mapping that is still unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title_field),
            ("start", &self.start_field),
            ("end", &self.end_field),
            ("detail", &self.detail_field),
            ("color", &self.color_field),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns true once every mapping is set.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Returns the five mapped column names.
    pub fn columns(&self) -> [&str; 5] {
        [
            &self.title_field,
            &self.start_field,
            &self.end_field,
            &self.detail_field,
            &self.color_field,
        ]
    }
}

/// A parsed event date-time.
///
/// Unparseable source values are carried as [`EventTime::Invalid`] rather
/// than rejected; the renderer decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventTime {
    /// A valid UTC instant.
    At(DateTime<Utc>),
    /// The source value could not be parsed (or was missing).
    Invalid {
        /// The original text, if there was any.
        raw: Option<String>,
    },
}

impl EventTime {
    /// Returns the instant if this time is valid.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(dt) => Some(*dt),
            Self::Invalid { .. } => None,
        }
    }

    /// Returns true if this is the invalid-date sentinel.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::At(dt)
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Invalid { .. } => write!(f, "Invalid date"),
        }
    }
}

/// The canonical calendar entry.
///
/// Built fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable row identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Start time.
    pub start: EventTime,
    /// End time. Not checked against `start`.
    pub end: EventTime,
    /// Description, possibly HTML. Not sanitized at this layer.
    pub detail: Option<String>,
    /// Color text exactly as found in the source.
    pub raw_color: Option<String>,
    /// Normalized render color, `None` when the raw color was unusable.
    pub background_color: Option<String>,
    /// Readable foreground for `background_color`.
    pub text_color: String,
}

impl Event {
    /// Returns true when both endpoints are valid and `start` is after `end`.
    pub fn has_inverted_range(&self) -> bool {
        match (self.start.as_datetime(), self.end.as_datetime()) {
            (Some(start), Some(end)) => start > end,
            _ => false,
        }
    }
}

/// Event payload consumed by the details panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Event title.
    pub title: String,
    /// Start time.
    pub start: EventTime,
    /// End time.
    pub end: EventTime,
    /// Accent color shown in the panel header.
    pub color: Option<String>,
    /// Description, possibly HTML.
    pub description: Option<String>,
    /// Location, if the source provides one.
    pub location: Option<String>,
    /// Row identifier.
    pub id: Option<String>,
    /// Link back to the item in the source.
    pub url: Option<String>,
}

impl From<&Event> for EventDetails {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
            color: event.background_color.clone(),
            description: event.detail.clone(),
            location: None,
            id: Some(event.id.clone()),
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn raw_record_null_and_absent_look_the_same() {
        let record = RawRecord::new().with("Title", "x").with_null("Color");
        assert_eq!(record.get("Title"), Some("x"));
        assert_eq!(record.get("Color"), None);
        assert_eq!(record.get("Missing"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn raw_record_id_falls_back() {
        assert_eq!(RawRecord::new().with("Id", "7").id(), "7");
        assert_eq!(RawRecord::new().with("ID", "8").id(), "8");
        assert_eq!(RawRecord::new().id(), "");
    }

    #[test]
    fn raw_record_deserializes_from_json_object() {
        let record: RawRecord =
            serde_json::from_str(r#"{"Title": "Sync", "Color": null}"#).unwrap();
        assert_eq!(record.get("Title"), Some("Sync"));
        assert_eq!(record.get("Color"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn mapping_reports_missing_fields() {
        let mapping = FieldMappingConfig {
            title_field: "Title".into(),
            start_field: "EventDate".into(),
            end_field: " ".into(),
            ..Default::default()
        };
        assert_eq!(mapping.missing_fields(), vec!["end", "detail", "color"]);
        assert!(!mapping.is_complete());
    }

    #[test]
    fn complete_mapping() {
        let mapping = FieldMappingConfig::new("Title", "Start", "End", "Detail", "Color");
        assert!(mapping.is_complete());
        assert_eq!(mapping.columns(), ["Title", "Start", "End", "Detail", "Color"]);
    }

    #[test]
    fn inverted_range_is_reported_not_rejected() {
        let event = Event {
            id: "1".into(),
            title: "Backwards".into(),
            start: utc(10).into(),
            end: utc(9).into(),
            detail: None,
            raw_color: None,
            background_color: None,
            text_color: "#000".into(),
        };
        assert!(event.has_inverted_range());

        let open_ended = Event {
            end: EventTime::Invalid { raw: None },
            ..event
        };
        assert!(!open_ended.has_inverted_range());
    }

    #[test]
    fn event_time_display() {
        assert_eq!(EventTime::At(utc(9)).to_string(), "2024-03-01T09:00:00+00:00");
        assert_eq!(
            EventTime::Invalid { raw: Some("soon".into()) }.to_string(),
            "Invalid date"
        );
    }

    #[test]
    fn details_from_event() {
        let event = Event {
            id: "42".into(),
            title: "Review".into(),
            start: utc(9).into(),
            end: utc(10).into(),
            detail: Some("<p>notes</p>".into()),
            raw_color: Some("f00".into()),
            background_color: Some("#f00".into()),
            text_color: "#fff".into(),
        };
        let details = EventDetails::from(&event);
        assert_eq!(details.id.as_deref(), Some("42"));
        assert_eq!(details.color.as_deref(), Some("#f00"));
        assert_eq!(details.description.as_deref(), Some("<p>notes</p>"));
        assert!(details.location.is_none());
    }
}
