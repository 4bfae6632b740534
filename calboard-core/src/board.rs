//! Session controller.
//!
//! A [`Board`] owns the live event collection, its undo history and the store
//! it is persisted to. Every edit follows the same path: the reconciler
//! computes a new collection, the history records it, the store saves it.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::codec;
use crate::error::CalBoardResult;
use crate::event::{Event, EventCollection, EventDraft, TimeSlot};
use crate::history::History;
use crate::reconcile::{self, SaveMode};
use crate::renderer::{self, RendererEvent, SlotChange, SlotChangeKind};
use crate::shortcut::{HistoryAction, KeyChord, history_action};
use crate::slot::{FlattenedSlot, SlotKey};
use crate::store::{EventStore, load_or_seed};

pub struct Board<S: EventStore> {
    events: EventCollection,
    history: History<EventCollection>,
    store: S,
}

impl<S: EventStore> Board<S> {
    /// Load the stored collection (or seed sample events) and start a fresh history.
    pub fn open(store: S, seed: bool, now: DateTime<Utc>) -> CalBoardResult<Self> {
        let events = load_or_seed(&store, seed, now)?;
        Ok(Board {
            history: History::new(events.clone()),
            events,
            store,
        })
    }

    pub fn events(&self) -> &EventCollection {
        &self.events
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn flatten(&self) -> Vec<FlattenedSlot> {
        reconcile::flatten(&self.events)
    }

    pub fn render_events(&self) -> Vec<RendererEvent> {
        renderer::render_events(&self.events)
    }

    pub fn resolve_click(&self, composite_id: &str) -> Option<&Event> {
        reconcile::resolve_clicked_event(&self.events, composite_id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Returns the new event's id.
    pub fn create_event(&mut self, draft: EventDraft) -> CalBoardResult<String> {
        let id = reconcile::new_event_id(&self.events);
        let mode = SaveMode::Create { id: id.clone() };
        let next = reconcile::save_event(&self.events, &mode, draft);
        self.commit(next)?;
        Ok(id)
    }

    /// Returns whether an event with that id existed.
    pub fn update_event(&mut self, id: &str, draft: EventDraft) -> CalBoardResult<bool> {
        let mode = SaveMode::Edit { id: id.to_string() };
        let next = reconcile::save_event(&self.events, &mode, draft);
        self.commit(next)
    }

    pub fn delete_event(&mut self, id: &str) -> CalBoardResult<bool> {
        let next = reconcile::delete_event(&self.events, id);
        self.commit(next)
    }

    pub fn remove_slot(&mut self, key: &SlotKey) -> CalBoardResult<bool> {
        let next = reconcile::remove_slot(&self.events, key);
        self.commit(next)
    }

    pub fn add_slot(&mut self, id: &str, slot: TimeSlot) -> CalBoardResult<bool> {
        let next = reconcile::add_slot(&self.events, id, slot);
        self.commit(next)
    }

    pub fn drag(&mut self, change: &SlotChange) -> CalBoardResult<bool> {
        let next = renderer::apply_slot_change(&self.events, SlotChangeKind::Drag, change);
        self.commit(next)
    }

    pub fn resize(&mut self, change: &SlotChange) -> CalBoardResult<bool> {
        let next = renderer::apply_slot_change(&self.events, SlotChangeKind::Resize, change);
        self.commit(next)
    }

    /// Replace the collection with the contents of an import file.
    ///
    /// On error nothing changes: not the live collection, not the history,
    /// not the store.
    pub fn import_json(&mut self, text: &str) -> CalBoardResult<usize> {
        let imported = match codec::import_json(text) {
            Ok(events) => events,
            Err(error) => {
                warn!(%error, "Import discarded");
                return Err(error);
            }
        };

        let count = imported.len();
        self.commit(imported)?;
        Ok(count)
    }

    pub fn export_json(&self) -> CalBoardResult<String> {
        codec::export_json(&self.events)
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> CalBoardResult<bool> {
        self.step(HistoryAction::Undo)
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> CalBoardResult<bool> {
        self.step(HistoryAction::Redo)
    }

    /// Run the history action bound to `chord`.
    ///
    /// `Some` means the chord was handled (even if the stack was empty) and
    /// its default behavior should be suppressed.
    pub fn handle_shortcut(&mut self, chord: &KeyChord) -> CalBoardResult<Option<HistoryAction>> {
        let Some(action) = history_action(chord) else {
            return Ok(None);
        };

        match action {
            HistoryAction::Undo => self.undo()?,
            HistoryAction::Redo => self.redo()?,
        };

        Ok(Some(action))
    }

    /// Record `next` as the new state if it differs from the current one.
    ///
    /// Nothing changes unless the store accepted `next`.
    fn commit(&mut self, next: EventCollection) -> CalBoardResult<bool> {
        if next == self.events {
            debug!("Edit changed nothing, skipping commit");
            return Ok(false);
        }

        self.store.save(&next)?;
        self.history.push(next.clone());
        self.events = next;
        debug!(
            events = self.events.len(),
            undo_depth = self.history.undo_depth(),
            "Committed"
        );
        Ok(true)
    }

    /// Move one step through the history. A failed save steps back again.
    fn step(&mut self, action: HistoryAction) -> CalBoardResult<bool> {
        let stepped = match action {
            HistoryAction::Undo => self.history.undo(),
            HistoryAction::Redo => self.history.redo(),
        };
        let Some(events) = stepped else {
            return Ok(false);
        };

        if let Err(error) = self.store.save(&events) {
            match action {
                HistoryAction::Undo => self.history.redo(),
                HistoryAction::Redo => self.history.undo(),
            };
            return Err(error);
        }

        self.events = events;
        Ok(true)
    }
}
