//! Conversion of JSON rows into [`RawRecord`]s.
//!
//! Shared by every gateway that reads JSON, so a row decodes the same way
//! whether it comes from a REST response or a fixture file.

use listcal_core::RawRecord;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Converts one item object into a [`RawRecord`].
///
/// Scalars become text, `null` stays `None`, expanded lookup objects are
/// flattened one level into `Parent/Child` keys and arrays are kept as JSON
/// text. OData bookkeeping keys are skipped.
pub fn record_from_json(item: Map<String, Value>) -> RawRecord {
    let mut record = RawRecord::new();
    for (key, value) in item {
        if is_metadata_key(&key) {
            continue;
        }
        match value {
            Value::Object(nested) => {
                for (child, child_value) in nested {
                    if !is_metadata_key(&child) {
                        record.insert(format!("{}/{}", key, child), scalar_text(child_value));
                    }
                }
            }
            other => record.insert(key, scalar_text(other)),
        }
    }
    record
}

fn is_metadata_key(key: &str) -> bool {
    key.starts_with("odata.") || key.starts_with("@odata") || key == "__metadata"
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Deserializes a list of JSON objects as records, coercing scalar values.
pub fn deserialize_records<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(items.into_iter().map(record_from_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_item_json() {
        let item = json!({
            "Id": 17,
            "Title": "Planning",
            "EventDate": "2024-03-01T09:00:00Z",
            "Color": null,
            "AllDay": false,
            "Categories": ["a", "b"],
            "Author": { "ID": 3, "Title": "Dana" },
            "odata.etag": "\"4\""
        });
        let Value::Object(map) = item else {
            unreachable!()
        };
        let record = record_from_json(map);

        assert_eq!(record.id(), "17");
        assert_eq!(record.get("Title"), Some("Planning"));
        assert_eq!(record.get("Color"), None);
        assert_eq!(record.get("AllDay"), Some("false"));
        assert_eq!(record.get("Categories"), Some(r#"["a","b"]"#));
        assert_eq!(record.get("Author/ID"), Some("3"));
        assert_eq!(record.get("Author/Title"), Some("Dana"));
        assert_eq!(record.get("odata.etag"), None);
        assert_eq!(record.len(), 8);
    }

    #[test]
    fn deserializes_rows_with_numbers() {
        #[derive(Deserialize)]
        struct Rows {
            #[serde(deserialize_with = "deserialize_records")]
            rows: Vec<RawRecord>,
        }

        let rows: Rows =
            serde_json::from_str(r#"{"rows": [{"Id": 1, "Title": "A", "Color": null}]}"#).unwrap();
        assert_eq!(rows.rows[0].id(), "1");
        assert_eq!(rows.rows[0].get("Title"), Some("A"));
        assert_eq!(rows.rows[0].get("Color"), None);
    }
}
