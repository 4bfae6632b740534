pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod new;
pub mod session;
pub mod show;
pub mod slots;
pub mod transfer;

use std::path::PathBuf;

use anyhow::Result;
use calboard_core::Board;
use calboard_core::config::CalBoardConfig;
use calboard_core::store::EventStore;
use clap::Subcommand;

/// Commands that change the event collection. Available both as one-shot
/// commands and inside a session.
#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Create an event
    New {
        title: String,

        /// Start date or date/time (e.g. "2025-03-20", "tomorrow 3pm")
        #[arg(short, long)]
        start: String,

        /// End date or date/time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration instead of an end (e.g. "3 days", "90min")
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Display color (e.g. "#3788d8")
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Edit an event's title, description, color, or its only slot
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// New start (replaces all slots with a single one)
        #[arg(short, long)]
        start: Option<String>,

        /// New end (requires --start)
        #[arg(short, long, requires = "start")]
        end: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete an event and all its slots
    Delete { id: String },
    /// Add a time slot to an event
    AddSlot {
        id: String,

        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: Option<String>,
    },
    /// Remove one slot (removing the last slot deletes the event)
    RemoveSlot {
        /// Slot id as shown by `list` (e.g. "1700000000000-0")
        slot: String,
    },
    /// Move a slot to a new range
    Move {
        slot: String,

        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: Option<String>,
    },
    /// Change where a slot ends
    Resize {
        slot: String,

        #[arg(short, long)]
        end: String,
    },
    /// Replace all events with the contents of a JSON export
    Import { path: PathBuf },
}

pub fn run_edit<S: EventStore>(
    board: &mut Board<S>,
    config: &CalBoardConfig,
    command: EditCommand,
) -> Result<()> {
    match command {
        EditCommand::New {
            title,
            start,
            end,
            duration,
            description,
            color,
        } => {
            let color = color.or_else(|| config.default_color.clone());
            new::run(board, new::NewEvent {
                title,
                start,
                end,
                duration,
                description,
                color,
            })
        }
        EditCommand::Edit {
            id,
            title,
            start,
            end,
            description,
            color,
        } => edit::run(board, &id, edit::EventChanges {
            title,
            start,
            end,
            description,
            color,
        }),
        EditCommand::Delete { id } => delete::run(board, &id),
        EditCommand::AddSlot { id, start, end } => slots::add(board, &id, &start, end.as_deref()),
        EditCommand::RemoveSlot { slot } => slots::remove(board, &slot),
        EditCommand::Move { slot, start, end } => {
            slots::move_slot(board, &slot, &start, end.as_deref())
        }
        EditCommand::Resize { slot, end } => slots::resize(board, &slot, &end),
        EditCommand::Import { path } => transfer::import(board, &path),
    }
}
