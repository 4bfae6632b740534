//! Sample events for a calendar that has never been saved.

use chrono::{DateTime, Duration, Utc};

use crate::event::{Event, EventCollection, TimeSlot};

pub fn seed_events(now: DateTime<Utc>) -> EventCollection {
    EventCollection::new(vec![
        Event {
            id: "1".to_string(),
            title: "Sample event".to_string(),
            time_slots: vec![TimeSlot::single(now)],
            all_day: true,
            description: None,
            color: None,
        },
        Event {
            id: "2".to_string(),
            title: "Sample multi-day event".to_string(),
            time_slots: vec![TimeSlot::new(now, Some(now + Duration::days(2)))],
            all_day: true,
            description: None,
            color: None,
        },
    ])
}
