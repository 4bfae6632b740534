//! JSON encoding of event collections.
//!
//! Dates are written as ISO-8601 UTC strings with millisecond precision and
//! read back from anything date-constructible: RFC 3339, naive date-times,
//! bare dates, or epoch milliseconds.
//!
//! Three entry points share the same event decoder but differ in how they
//! treat bad input:
//! - [`decode_stored`] is lenient: unreadable text or a non-array value
//!   yields an empty collection and malformed entries are dropped.
//! - [`import_json`] is strict: anything wrong aborts the whole import.
//! - [`export_json`] writes pretty JSON with 2-space indentation.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{CalBoardError, CalBoardResult};
use crate::event::{Event, EventCollection, TimeSlot};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Format a date the way it is persisted (`2024-01-05T00:00:00.000Z`).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date-constructible string into a UTC instant.
///
/// Naive date-times and bare dates are taken as UTC.
pub fn parse_datetime(s: &str) -> CalBoardResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    parse_naive(s)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CalBoardError::InvalidDate(s.to_string()))
}

/// Parse a date or date-time without an offset. Bare dates are midnight.
pub fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// A JSON value that can be turned into a date.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl DateInput {
    fn into_datetime(self) -> CalBoardResult<DateTime<Utc>> {
        match self {
            DateInput::Text(s) => parse_datetime(&s),
            DateInput::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| CalBoardError::InvalidDate(ms.to_string())),
            DateInput::FractionalMillis(ms) => DateTime::from_timestamp_millis(ms as i64)
                .ok_or_else(|| CalBoardError::InvalidDate(ms.to_string())),
        }
    }
}

/// Serde adapter for `DateTime<Utc>` fields.
pub mod iso_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{DateInput, format_datetime};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_datetime(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateInput::deserialize(deserializer)?
            .into_datetime()
            .map_err(serde::de::Error::custom)
    }

    /// Same as the parent module, for `Option<DateTime<Utc>>` (null/missing is `None`).
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::{DateInput, format_datetime};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_some(&format_datetime(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<DateInput>::deserialize(deserializer)?
                .map(DateInput::into_datetime)
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Event as found in storage or an import file.
///
/// Older files carry a single top-level `start`/`end` pair instead of
/// `timeSlots`; those become a one-slot event.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: RawId,
    title: String,
    #[serde(default)]
    time_slots: Option<Vec<TimeSlot>>,
    #[serde(default, with = "iso_datetime::option")]
    start: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_datetime::option")]
    end: Option<DateTime<Utc>>,
    #[serde(default)]
    all_day: Option<bool>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl RawEvent {
    fn into_event(self) -> Result<Event, String> {
        let id = match self.id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        };

        if self.title.trim().is_empty() {
            return Err(format!("event '{}' has an empty title", id));
        }

        let time_slots = match (self.time_slots, self.start) {
            (Some(slots), _) if !slots.is_empty() => slots,
            (_, Some(start)) => vec![TimeSlot::new(start, self.end)],
            _ => return Err(format!("event '{}' has no time slots", id)),
        };
        if let Some(index) = time_slots.iter().position(|slot| !slot.is_well_formed()) {
            return Err(format!("event '{}' slot #{} ends before it starts", id, index));
        }

        Ok(Event {
            id,
            title: self.title,
            time_slots,
            all_day: self.all_day.unwrap_or(true),
            description: self.description,
            color: self.color,
        })
    }
}

fn decode_entry(entry: Value) -> Result<Event, String> {
    let raw: RawEvent = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    raw.into_event()
}

/// Decode the persisted collection. Never fails: whatever cannot be read
/// is dropped with a warning.
pub fn decode_stored(text: &str) -> EventCollection {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "Stored events are not valid JSON, starting with an empty calendar");
            return EventCollection::default();
        }
    };

    let Value::Array(entries) = value else {
        warn!("Stored events are not a JSON array, starting with an empty calendar");
        return EventCollection::default();
    };

    let mut seen = HashSet::new();
    let mut events = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        match decode_entry(entry) {
            Ok(event) if seen.insert(event.id.clone()) => events.push(event),
            Ok(event) => warn!(id = %event.id, "Skipping stored event with duplicate id"),
            Err(error) => warn!(index, %error, "Skipping malformed stored event"),
        }
    }

    EventCollection::new(events)
}

/// Encode the collection for storage (compact JSON).
pub fn encode_stored(events: &EventCollection) -> CalBoardResult<String> {
    Ok(serde_json::to_string(events)?)
}

/// Parse an import file. Either every entry decodes or nothing is imported.
pub fn import_json(text: &str) -> CalBoardResult<EventCollection> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CalBoardError::MalformedImport(e.to_string()))?;

    let Value::Array(entries) = value else {
        return Err(CalBoardError::MalformedImport(
            "expected a JSON array of events".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    let mut events = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let event = decode_entry(entry).map_err(|e| {
            CalBoardError::MalformedImport(format!("event #{}: {}", index + 1, e))
        })?;
        if !seen.insert(event.id.clone()) {
            return Err(CalBoardError::MalformedImport(format!(
                "duplicate event id '{}'",
                event.id
            )));
        }
        events.push(event);
    }

    Ok(EventCollection::new(events))
}

/// Pretty JSON for the export file.
pub fn export_json(events: &EventCollection) -> CalBoardResult<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn formats_like_to_iso_string() {
        assert_eq!(
            format_datetime(&utc(2024, 1, 5, 9, 30)),
            "2024-01-05T09:30:00.000Z"
        );
    }

    #[test]
    fn parses_date_constructible_strings() {
        let expected = utc(2024, 1, 5, 9, 30);
        assert_eq!(parse_datetime("2024-01-05T09:30:00.000Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-05T11:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-05T09:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-05T09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-05 09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-05").unwrap(), utc(2024, 1, 5, 0, 0));
    }

    #[test]
    fn naive_parsing_ignores_offsets() {
        assert_eq!(
            parse_naive("2024-01-05 09:30").map(|dt| dt.and_utc()),
            Some(utc(2024, 1, 5, 9, 30))
        );
        assert_eq!(
            parse_naive("2024-01-05").map(|dt| dt.and_utc()),
            Some(utc(2024, 1, 5, 0, 0))
        );
        assert_eq!(parse_naive("2024-01-05T09:30:00Z"), None);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(
            parse_datetime("next week-ish"),
            Err(CalBoardError::InvalidDate(_))
        ));
    }

    #[test]
    fn decodes_epoch_millis() {
        let json = r#"[{"id":"1","title":"A","timeSlots":[{"start":1704067200000}]}]"#;
        let events = import_json(json).unwrap();
        assert_eq!(events.as_slice()[0].time_slots[0].start, utc(2024, 1, 1, 0, 0));
    }

    #[test]
    fn stored_round_trip_keeps_dates() {
        let events = EventCollection::new(vec![Event {
            id: "1".to_string(),
            title: "Trip".to_string(),
            time_slots: vec![
                TimeSlot::new(utc(2024, 1, 5, 0, 0), Some(utc(2024, 1, 7, 0, 0))),
                TimeSlot::single(utc(2024, 2, 1, 0, 0)),
            ],
            all_day: true,
            description: Some("pack light".to_string()),
            color: Some("#00aa00".to_string()),
        }]);

        let text = encode_stored(&events).unwrap();
        assert_eq!(decode_stored(&text), events);
    }

    #[test]
    fn stored_non_array_is_empty() {
        assert!(decode_stored("{}").is_empty());
        assert!(decode_stored("\"hello\"").is_empty());
        assert!(decode_stored("null").is_empty());
    }

    #[test]
    fn stored_invalid_json_is_empty() {
        assert!(decode_stored("not json").is_empty());
        assert!(decode_stored("").is_empty());
    }

    #[test]
    fn stored_skips_malformed_and_duplicate_entries() {
        let json = r#"[
            {"id":"1","title":"A","timeSlots":[{"start":"2024-01-01"}]},
            {"id":"2","title":"B","timeSlots":[{"start":"whenever"}]},
            {"id":"1","title":"A again","timeSlots":[{"start":"2024-01-02"}]},
            {"title":"no id","timeSlots":[{"start":"2024-01-03"}]},
            {"id":"3","title":"  ","timeSlots":[{"start":"2024-01-04"}]},
            {"id":"4","title":"D","timeSlots":[{"start":"2024-01-05","end":"2024-01-01"}]}
        ]"#;
        let events = decode_stored(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events.as_slice()[0].title, "A");
    }

    #[test]
    fn migrates_legacy_single_range_events() {
        let json = r#"[
            {"id":"2","title":"Multi","start":"2024-01-05T00:00:00.000Z","end":"2024-01-07T00:00:00.000Z"}
        ]"#;
        let events = decode_stored(json);
        let event = &events.as_slice()[0];
        assert!(event.all_day);
        assert_eq!(
            event.time_slots,
            vec![TimeSlot::new(utc(2024, 1, 5, 0, 0), Some(utc(2024, 1, 7, 0, 0)))]
        );
    }

    #[test]
    fn import_accepts_numeric_ids_and_null_end() {
        let json = r#"[{"id":17,"title":"A","allDay":false,"timeSlots":[{"start":"2024-01-01T10:00","end":null}]}]"#;
        let events = import_json(json).unwrap();
        let event = &events.as_slice()[0];
        assert_eq!(event.id, "17");
        assert!(!event.all_day);
        assert_eq!(event.time_slots[0].end, None);
    }

    #[test]
    fn import_rejects_non_array() {
        assert!(matches!(
            import_json("{}"),
            Err(CalBoardError::MalformedImport(_))
        ));
    }

    #[test]
    fn import_rejects_any_malformed_entry() {
        let json = r#"[
            {"id":"1","title":"A","timeSlots":[{"start":"2024-01-01"}]},
            {"id":"2","title":"B","timeSlots":[]}
        ]"#;
        let err = import_json(json).unwrap_err();
        assert!(err.to_string().contains("event #2"));
    }

    #[test]
    fn import_rejects_end_before_start() {
        let json = r#"[{"id":"x","title":"Trip","timeSlots":[
            {"start":"2024-01-01"},
            {"start":"2024-01-05","end":"2024-01-01"}
        ]}]"#;
        let err = import_json(json).unwrap_err();
        assert!(matches!(err, CalBoardError::MalformedImport(_)));
        assert!(err.to_string().contains("slot #1"));
    }

    #[test]
    fn import_rejects_empty_titles() {
        let json = r#"[{"id":"x","title":"","timeSlots":[{"start":"2024-01-05"}]}]"#;
        let err = import_json(json).unwrap_err();
        assert!(err.to_string().contains("empty title"));
    }

    #[test]
    fn import_rejects_duplicate_ids() {
        let json = r#"[
            {"id":"1","title":"A","timeSlots":[{"start":"2024-01-01"}]},
            {"id":"1","title":"B","timeSlots":[{"start":"2024-01-02"}]}
        ]"#;
        assert!(matches!(
            import_json(json),
            Err(CalBoardError::MalformedImport(_))
        ));
    }

    #[test]
    fn export_uses_two_space_indentation() {
        let events = EventCollection::new(vec![Event {
            id: "1".to_string(),
            title: "A".to_string(),
            time_slots: vec![TimeSlot::single(utc(2024, 1, 1, 0, 0))],
            all_day: true,
            description: None,
            color: None,
        }]);

        let text = export_json(&events).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"1\""));
        assert_eq!(import_json(&text).unwrap(), events);
    }
}
