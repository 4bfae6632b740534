//! Event/slot reconciliation.
//!
//! Maps the event collection onto the renderer's per-slot view and routes
//! renderer edits (drag, resize, delete) back to the right slot of the right
//! event. Every function is pure: it takes the current collection by
//! reference and returns a new one, which is what lets the caller push the
//! result straight into `History`.
//!
//! Lookups that miss (unknown event id, slot index out of range) leave the
//! collection unchanged. They happen when a stale UI reference arrives after
//! the event was already removed.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::event::{Event, EventCollection, EventDraft, TimeSlot};
use crate::slot::{FlattenedSlot, SlotKey};

/// How `save_event` applies a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// Append under `id`, which must not be in use yet.
    Create { id: String },
    Edit { id: String },
}

/// One entry per (event, slot index), events in collection order and slots
/// in stored order.
pub fn flatten(events: &EventCollection) -> Vec<FlattenedSlot> {
    events
        .iter()
        .flat_map(|event| {
            event
                .time_slots
                .iter()
                .enumerate()
                .map(move |(index, slot)| FlattenedSlot {
                    key: SlotKey::new(event.id.as_str(), index),
                    title: event.title.clone(),
                    start: slot.start,
                    end: slot.end,
                    all_day: event.all_day,
                    color: event.color.clone(),
                })
        })
        .collect()
}

/// Move a slot to the renderer-supplied range.
pub fn apply_drag(
    events: &EventCollection,
    key: &SlotKey,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> EventCollection {
    replace_slot(events, key, TimeSlot::new(start, end))
}

/// Resize a slot to the renderer-supplied range. Same contract as [`apply_drag`].
pub fn apply_resize(
    events: &EventCollection,
    key: &SlotKey,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> EventCollection {
    replace_slot(events, key, TimeSlot::new(start, end))
}

fn replace_slot(events: &EventCollection, key: &SlotKey, slot: TimeSlot) -> EventCollection {
    let mut updated = events.clone();

    match updated
        .get_mut(&key.event_id)
        .and_then(|event| event.time_slots.get_mut(key.index))
    {
        Some(target) => *target = slot,
        None => debug!(slot = %key, "Slot not found, ignoring change"),
    }

    updated
}

/// Create a new event or merge a draft into an existing one.
///
/// The title is not validated here; the form layer does that.
pub fn save_event(events: &EventCollection, mode: &SaveMode, draft: EventDraft) -> EventCollection {
    match mode {
        SaveMode::Create { id } if events.contains(id) => {
            debug!(id = %id, "Id already in use, ignoring create");
            events.clone()
        }
        SaveMode::Create { id } => insert_event(events, Event::from_draft(id.clone(), draft)),
        SaveMode::Edit { id } => {
            let mut updated = events.clone();
            match updated.get_mut(id) {
                Some(event) => event.apply_draft(draft),
                None => debug!(id = %id, "Event not found, ignoring edit"),
            }
            updated
        }
    }
}

/// Append a fully built event.
pub fn insert_event(events: &EventCollection, event: Event) -> EventCollection {
    let mut updated = events.clone();
    updated.events_mut().push(event);
    updated
}

pub fn delete_event(events: &EventCollection, id: &str) -> EventCollection {
    events.iter().filter(|e| e.id != id).cloned().collect()
}

/// Remove one slot. Removing an event's last slot removes the event.
pub fn remove_slot(events: &EventCollection, key: &SlotKey) -> EventCollection {
    let mut updated = events.clone();

    let Some(position) = updated.position(&key.event_id) else {
        debug!(slot = %key, "Event not found, ignoring slot removal");
        return updated;
    };

    let event = &mut updated.events_mut()[position];
    if key.index >= event.time_slots.len() {
        debug!(slot = %key, "Slot index out of range, ignoring slot removal");
        return updated;
    }

    event.time_slots.remove(key.index);
    if event.time_slots.is_empty() {
        updated.events_mut().remove(position);
    }

    updated
}

/// Add a slot to an event, keeping its slots ordered by start.
pub fn add_slot(events: &EventCollection, id: &str, slot: TimeSlot) -> EventCollection {
    let mut updated = events.clone();

    match updated.get_mut(id) {
        Some(event) => {
            let at = event
                .time_slots
                .partition_point(|existing| existing.start <= slot.start);
            event.time_slots.insert(at, slot);
        }
        None => debug!(id = %id, "Event not found, ignoring new slot"),
    }

    updated
}

/// Find the event behind a clicked composite slot id.
pub fn resolve_clicked_event<'a>(events: &'a EventCollection, composite_id: &str) -> Option<&'a Event> {
    let key: SlotKey = composite_id.parse().ok()?;
    events.get(&key.event_id)
}

/// A fresh event id not used by any event in `events`.
///
/// Simple-form UUIDs contain no slot key separator.
pub fn new_event_id(events: &EventCollection) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !events.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn event(id: &str, title: &str, slots: Vec<TimeSlot>) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            time_slots: slots,
            all_day: true,
            description: None,
            color: None,
        }
    }

    fn sample() -> EventCollection {
        EventCollection::new(vec![
            event(
                "a",
                "Trip",
                vec![TimeSlot::new(day(1), Some(day(2))), TimeSlot::single(day(3))],
            ),
            event("b", "Dentist", vec![TimeSlot::single(day(10))]),
        ])
    }

    #[test]
    fn flatten_emits_one_entry_per_slot_in_order() {
        let mut events = sample();
        events.events_mut()[0].color = Some("#123456".to_string());

        let flat = flatten(&events);
        let ids: Vec<String> = flat.iter().map(|s| s.composite_id()).collect();

        assert_eq!(ids, vec!["a-0", "a-1", "b-0"]);
        assert_eq!(flat[0].start, day(1));
        assert_eq!(flat[0].end, Some(day(2)));
        assert_eq!(flat[1].start, day(3));
        assert_eq!(flat[1].end, None);
        assert_eq!(flat[1].title, "Trip");
        assert_eq!(flat[1].color.as_deref(), Some("#123456"));
        assert_eq!(flat[2].color, None);
    }

    #[test]
    fn flatten_empty_collection() {
        assert!(flatten(&EventCollection::default()).is_empty());
    }

    #[test]
    fn drag_changes_only_the_target_slot() {
        let before = sample();
        let key: SlotKey = "a-1".parse().unwrap();
        let after = apply_drag(&before, &key, day(5), Some(day(6)));

        assert_eq!(
            after.get("a").unwrap().time_slots,
            vec![
                TimeSlot::new(day(1), Some(day(2))),
                TimeSlot::new(day(5), Some(day(6)))
            ]
        );
        assert_eq!(after.get("b"), before.get("b"));
        assert_eq!(after.get("a").unwrap().title, "Trip");
        // input untouched
        assert_eq!(before, sample());
    }

    #[test]
    fn resize_matches_drag() {
        let key = SlotKey::new("a", 0);
        assert_eq!(
            apply_resize(&sample(), &key, day(1), Some(day(4))),
            apply_drag(&sample(), &key, day(1), Some(day(4)))
        );
    }

    #[test]
    fn drag_with_unknown_target_is_a_no_op() {
        let events = sample();
        assert_eq!(apply_drag(&events, &SlotKey::new("zzz", 0), day(5), None), events);
        assert_eq!(apply_drag(&events, &SlotKey::new("b", 3), day(5), None), events);
    }

    #[test]
    fn create_appends_event_with_fresh_id() {
        let events = EventCollection::new(vec![event("1", "A", vec![TimeSlot::single(day(1))])]);
        let draft = EventDraft::new("B", vec![TimeSlot::new(day(5), Some(day(7)))]);

        let mode = SaveMode::Create { id: new_event_id(&events) };
        let updated = save_event(&events, &mode, draft);

        assert_eq!(updated.len(), 2);
        let created = &updated.as_slice()[1];
        assert_ne!(created.id, "1");
        assert!(!created.id.is_empty());
        assert!(!created.id.contains('-'));
        assert_eq!(created.title, "B");
        assert!(created.all_day);
        assert_eq!(created.time_slots, vec![TimeSlot::new(day(5), Some(day(7)))]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn create_with_taken_id_is_a_no_op() {
        let events = EventCollection::new(vec![event("1", "A", vec![TimeSlot::single(day(1))])]);
        let mode = SaveMode::Create { id: "1".to_string() };

        let updated = save_event(&events, &mode, EventDraft::new("B", vec![TimeSlot::single(day(2))]));

        assert_eq!(updated, events);
    }

    #[test]
    fn edit_merges_into_existing_event() {
        let mut events = sample();
        events.events_mut()[1].color = Some("red".to_string());

        let mut draft = EventDraft::new("Dentist (moved)", vec![TimeSlot::single(day(11))]);
        draft.description = Some("bring forms".to_string());
        let updated = save_event(&events, &SaveMode::Edit { id: "b".to_string() }, draft);

        let edited = updated.get("b").unwrap();
        assert_eq!(edited.title, "Dentist (moved)");
        assert_eq!(edited.time_slots, vec![TimeSlot::single(day(11))]);
        assert_eq!(edited.description.as_deref(), Some("bring forms"));
        assert_eq!(edited.color.as_deref(), Some("red"));
        assert_eq!(updated.position("b"), Some(1));
        assert_eq!(updated.get("a"), events.get("a"));
    }

    #[test]
    fn edit_unknown_id_is_a_no_op() {
        let events = sample();
        let draft = EventDraft::new("X", vec![TimeSlot::single(day(1))]);
        assert_eq!(
            save_event(&events, &SaveMode::Edit { id: "nope".to_string() }, draft),
            events
        );
    }

    #[test]
    fn delete_removes_event() {
        let updated = delete_event(&sample(), "a");
        assert_eq!(updated.len(), 1);
        assert!(!updated.contains("a"));
        assert_eq!(delete_event(&sample(), "missing"), sample());
    }

    #[test]
    fn removing_last_slot_removes_event() {
        let updated = remove_slot(&sample(), &SlotKey::new("b", 0));
        assert_eq!(updated.len(), 1);
        assert!(!updated.contains("b"));
    }

    #[test]
    fn removing_one_of_two_slots_keeps_event() {
        let updated = remove_slot(&sample(), &SlotKey::new("a", 0));
        let trip = updated.get("a").unwrap();
        assert_eq!(trip.time_slots, vec![TimeSlot::single(day(3))]);
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn removing_unknown_slot_is_a_no_op() {
        assert_eq!(remove_slot(&sample(), &SlotKey::new("a", 2)), sample());
        assert_eq!(remove_slot(&sample(), &SlotKey::new("q", 0)), sample());
    }

    #[test]
    fn add_slot_keeps_slots_sorted() {
        let updated = add_slot(&sample(), "a", TimeSlot::single(day(2)));
        let starts: Vec<_> = updated
            .get("a")
            .unwrap()
            .time_slots
            .iter()
            .map(|s| s.start)
            .collect();
        assert_eq!(starts, vec![day(1), day(2), day(3)]);

        let updated = add_slot(&updated, "a", TimeSlot::single(day(20)));
        assert_eq!(updated.get("a").unwrap().time_slots.last().unwrap().start, day(20));
        assert_eq!(add_slot(&sample(), "missing", TimeSlot::single(day(2))), sample());
    }

    #[test]
    fn resolves_clicked_event() {
        let events = sample();
        assert_eq!(resolve_clicked_event(&events, "a-1").map(|e| e.title.as_str()), Some("Trip"));
        assert_eq!(resolve_clicked_event(&events, "b-0").map(|e| e.id.as_str()), Some("b"));
        assert!(resolve_clicked_event(&events, "c-0").is_none());
        assert!(resolve_clicked_event(&events, "garbage").is_none());
    }

    #[test]
    fn resolves_ids_containing_separator() {
        let events = EventCollection::new(vec![event(
            "team-sync",
            "Sync",
            vec![TimeSlot::single(day(1))],
        )]);
        assert!(resolve_clicked_event(&events, "team-sync-0").is_some());
        let moved = apply_drag(&events, &"team-sync-0".parse().unwrap(), day(2), None);
        assert_eq!(moved.get("team-sync").unwrap().time_slots[0].start, day(2));
    }
}
