//! Per-slot view of the event collection.
//!
//! The renderer works with one entry per (event, slot index) pair. Internally
//! that pair is a [`SlotKey`]; it only becomes a composite string id
//! (`"<event-id>-<index>"`) at the renderer boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::constants::SLOT_KEY_SEPARATOR;
use crate::error::{CalBoardError, CalBoardResult};

/// Identifies one slot inside one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub event_id: String,
    pub index: usize,
}

impl SlotKey {
    pub fn new(event_id: impl Into<String>, index: usize) -> Self {
        SlotKey {
            event_id: event_id.into(),
            index,
        }
    }

    pub fn composite_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.event_id, SLOT_KEY_SEPARATOR, self.index)
    }
}

impl FromStr for SlotKey {
    type Err = CalBoardError;

    /// Split on the last separator. The index never contains the separator,
    /// so event ids that do still parse back unchanged.
    fn from_str(s: &str) -> CalBoardResult<Self> {
        let invalid = || CalBoardError::InvalidSlotKey(s.to_string());

        let (event_id, index) = s.rsplit_once(SLOT_KEY_SEPARATOR).ok_or_else(invalid)?;
        if event_id.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let index = index.parse::<usize>().map_err(|_| invalid())?;

        Ok(SlotKey::new(event_id, index))
    }
}

/// One renderer-facing occurrence. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedSlot {
    pub key: SlotKey,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub color: Option<String>,
}

impl FlattenedSlot {
    pub fn composite_id(&self) -> String {
        self.key.composite_id()
    }
}
