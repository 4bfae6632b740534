//! Calendar events and their time slots.
//!
//! An [`Event`] owns one or more [`TimeSlot`]s. The [`EventCollection`] is the
//! unit that gets persisted, exported and snapshotted for undo/redo; it is
//! always replaced wholesale rather than edited in place.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::iso_datetime;
use crate::slot::SlotKey;

/// One contiguous date range belonging to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "iso_datetime")]
    pub start: DateTime<Utc>,
    /// `None` means the slot is a single occurrence at `start`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_datetime::option"
    )]
    pub end: Option<DateTime<Utc>>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        TimeSlot { start, end }
    }

    pub fn single(start: DateTime<Utc>) -> Self {
        TimeSlot { start, end: None }
    }

    /// End of the slot, falling back to `start` for single occurrences.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start)
    }

    /// `end` (when present) must not precede `start`.
    pub fn is_well_formed(&self) -> bool {
        self.end.is_none_or(|end| end >= self.start)
    }
}

fn default_all_day() -> bool {
    true
}

/// A user-created calendar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique within a collection, never changes after creation.
    pub id: String,
    pub title: String,
    pub time_slots: Vec<TimeSlot>,
    #[serde(default = "default_all_day")]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color token (e.g. "#3788d8" or "tomato").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    pub fn from_draft(id: String, draft: EventDraft) -> Self {
        Event {
            id,
            title: draft.title,
            time_slots: draft.time_slots,
            all_day: draft.all_day,
            description: draft.description,
            color: draft.color,
        }
    }

    /// Merge a draft into this event. Title, slots and the all-day flag are
    /// replaced; description and color only when the draft carries them.
    pub fn apply_draft(&mut self, draft: EventDraft) {
        self.title = draft.title;
        self.time_slots = draft.time_slots;
        self.all_day = draft.all_day;
        if draft.description.is_some() {
            self.description = draft.description;
        }
        if draft.color.is_some() {
            self.color = draft.color;
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// The fields a user submits when creating or editing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub time_slots: Vec<TimeSlot>,
    pub all_day: bool,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl EventDraft {
    /// An all-day draft without description or color.
    pub fn new(title: impl Into<String>, time_slots: Vec<TimeSlot>) -> Self {
        EventDraft {
            title: title.into(),
            time_slots,
            all_day: true,
            description: None,
            color: None,
        }
    }

    /// Prefill a draft from an existing event (the edit form's starting point).
    pub fn from_event(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            time_slots: event.time_slots.clone(),
            all_day: event.all_day,
            description: event.description.clone(),
            color: event.color.clone(),
        }
    }
}

/// Ordered list of events keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCollection(Vec<Event>);

impl EventCollection {
    pub fn new(events: Vec<Event>) -> Self {
        EventCollection(events)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.0
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.0.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|e| e.id == id)
    }

    pub fn slot(&self, key: &SlotKey) -> Option<&TimeSlot> {
        self.get(&key.event_id)
            .and_then(|e| e.time_slots.get(key.index))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.0.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<Event> {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Event> for EventCollection {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        EventCollection(iter.into_iter().collect())
    }
}
