use anyhow::Result;
use calboard_core::Board;
use calboard_core::event::{EventDraft, TimeSlot};
use calboard_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::utils::when::{apply_duration, parse_end, parse_when, resolve_end};

pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub fn run<S: EventStore>(board: &mut Board<S>, new: NewEvent) -> Result<()> {
    let title = new.title.trim();
    if title.is_empty() {
        anyhow::bail!("Title must not be empty");
    }

    let start = parse_when(&new.start)?;
    let end = match (&new.end, &new.duration) {
        (Some(end), _) => Some(parse_end(end, &start)?),
        (None, Some(duration)) => Some(apply_duration(&start, duration)?),
        (None, None) => None,
    };
    let end = resolve_end(&start, end)?;

    let draft = EventDraft {
        title: title.to_string(),
        time_slots: vec![TimeSlot::new(start.at, end)],
        all_day: start.all_day,
        description: new.description.filter(|d| !d.is_empty()),
        color: new.color,
    };

    let id = board.create_event(draft)?;
    println!(
        "{} {}",
        format!("  Created: {}", title).green(),
        format!("({})", id).dimmed()
    );

    Ok(())
}
