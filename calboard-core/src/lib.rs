//! Core library for calboard.
//!
//! This crate holds everything behind the calendar UI:
//! - `event` and `slot`: events, their time slots, and the per-slot view
//! - `reconcile`: pure edits between the two (drag, resize, save, delete)
//! - `history`: linear undo/redo over snapshots
//! - `codec` and `store`: JSON persistence, import and export
//! - `board`: the session controller tying it all together

pub mod board;
pub mod codec;
pub mod config;
pub mod constants;
pub mod defaults;
pub mod error;
pub mod event;
pub mod history;
pub mod reconcile;
pub mod renderer;
pub mod shortcut;
pub mod slot;
pub mod store;

pub use board::Board;
pub use error::{CalBoardError, CalBoardResult};
pub use event::{Event, EventCollection, EventDraft, TimeSlot};
pub use history::History;
pub use slot::{FlattenedSlot, SlotKey};
