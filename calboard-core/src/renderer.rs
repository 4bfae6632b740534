//! Shapes exchanged with the calendar renderer.
//!
//! The renderer consumes [`RendererEvent`]s and reports drags and resizes
//! as [`SlotChange`] payloads keyed by composite slot id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::iso_datetime;
use crate::event::EventCollection;
use crate::reconcile::{apply_drag, apply_resize, flatten};
use crate::slot::{FlattenedSlot, SlotKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererEvent {
    /// Composite slot id.
    pub id: String,
    pub title: String,
    #[serde(with = "iso_datetime")]
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_datetime::option")]
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl From<&FlattenedSlot> for RendererEvent {
    fn from(slot: &FlattenedSlot) -> Self {
        RendererEvent {
            id: slot.composite_id(),
            title: slot.title.clone(),
            start: slot.start,
            end: slot.end,
            all_day: slot.all_day,
            background_color: slot.color.clone(),
            border_color: slot.color.clone(),
        }
    }
}

pub fn render_events(events: &EventCollection) -> Vec<RendererEvent> {
    flatten(events).iter().map(RendererEvent::from).collect()
}

/// Payload of a drag or resize callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotChange {
    /// Composite slot id.
    pub id: String,
    #[serde(with = "iso_datetime")]
    pub start: DateTime<Utc>,
    #[serde(default, with = "iso_datetime::option")]
    pub end: Option<DateTime<Utc>>,
}

impl SlotChange {
    pub fn new(key: &SlotKey, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        SlotChange {
            id: key.composite_id(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChangeKind {
    Drag,
    Resize,
}

/// Route a renderer callback to the matching reconciler operation.
///
/// An id that does not parse leaves the collection unchanged.
pub fn apply_slot_change(
    events: &EventCollection,
    kind: SlotChangeKind,
    change: &SlotChange,
) -> EventCollection {
    let key: SlotKey = match change.id.parse() {
        Ok(key) => key,
        Err(error) => {
            warn!(%error, "Ignoring slot change");
            return events.clone();
        }
    };

    match kind {
        SlotChangeKind::Drag => apply_drag(events, &key, change.start, change.end),
        SlotChangeKind::Resize => apply_resize(events, &key, change.start, change.end),
    }
}
