use anyhow::Result;
use calboard_core::Board;
use calboard_core::event::{EventDraft, TimeSlot};
use calboard_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::utils::when::{parse_end, parse_when, resolve_end};

/// Fields to change; `None` keeps the current value.
pub struct EventChanges {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub fn run<S: EventStore>(board: &mut Board<S>, id: &str, changes: EventChanges) -> Result<()> {
    let event = board
        .events()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Event '{}' not found", id))?;
    let mut draft = EventDraft::from_event(event);

    if let Some(title) = changes.title {
        let title = title.trim();
        if title.is_empty() {
            anyhow::bail!("Title must not be empty");
        }
        draft.title = title.to_string();
    }

    if let Some(start) = changes.start {
        let start = parse_when(&start)?;
        let end = changes
            .end
            .map(|end| parse_end(&end, &start))
            .transpose()?;
        draft.time_slots = vec![TimeSlot::new(start.at, resolve_end(&start, end)?)];
        draft.all_day = start.all_day;
    }

    if changes.description.is_some() {
        draft.description = changes.description;
    }
    if changes.color.is_some() {
        draft.color = changes.color;
    }

    let title = draft.title.clone();
    if board.update_event(id, draft)? {
        println!("{}", format!("  Updated: {}", title).green());
    } else {
        println!("{}", "  Nothing to change".dimmed());
    }

    Ok(())
}
