//! Slot-level edits: the CLI stand-ins for dragging and resizing on the grid.

use anyhow::Result;
use calboard_core::Board;
use calboard_core::event::TimeSlot;
use calboard_core::renderer::SlotChange;
use calboard_core::slot::SlotKey;
use calboard_core::store::EventStore;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use crate::utils::when::{When, parse_end, parse_when, resolve_end};

pub fn add<S: EventStore>(
    board: &mut Board<S>,
    id: &str,
    start: &str,
    end: Option<&str>,
) -> Result<()> {
    if !board.events().contains(id) {
        anyhow::bail!("Event '{}' not found", id);
    }

    let (start, end) = parse_range(start, end)?;
    board.add_slot(id, TimeSlot::new(start.at, end))?;
    println!("{}", "  Slot added".green());

    Ok(())
}

pub fn remove<S: EventStore>(board: &mut Board<S>, slot: &str) -> Result<()> {
    let key: SlotKey = slot.parse()?;
    let last_slot = match board.events().get(&key.event_id) {
        Some(event) if key.index < event.time_slots.len() => event.time_slots.len() == 1,
        _ => anyhow::bail!("Slot '{}' not found", slot),
    };

    board.remove_slot(&key)?;

    if last_slot {
        println!("{}", "  Removed the last slot, event deleted".red());
    } else {
        println!("{}", "  Slot removed".green());
    }

    Ok(())
}

pub fn move_slot<S: EventStore>(
    board: &mut Board<S>,
    slot: &str,
    start: &str,
    end: Option<&str>,
) -> Result<()> {
    let key: SlotKey = slot.parse()?;
    if board.events().slot(&key).is_none() {
        anyhow::bail!("Slot '{}' not found", slot);
    }

    let (start, end) = parse_range(start, end)?;
    report(board.drag(&SlotChange::new(&key, start.at, end))?, "Slot moved");

    Ok(())
}

/// Change where a slot ends; its start stays put.
pub fn resize<S: EventStore>(board: &mut Board<S>, slot: &str, end: &str) -> Result<()> {
    let key: SlotKey = slot.parse()?;
    let start = match (board.events().get(&key.event_id), board.events().slot(&key)) {
        (Some(event), Some(existing)) => When {
            at: existing.start,
            all_day: event.all_day,
        },
        _ => anyhow::bail!("Slot '{}' not found", slot),
    };

    let end = resolve_end(&start, Some(parse_end(end, &start)?))?;
    report(board.resize(&SlotChange::new(&key, start.at, end))?, "Slot resized");

    Ok(())
}

fn parse_range(start: &str, end: Option<&str>) -> Result<(When, Option<DateTime<Utc>>)> {
    let start = parse_when(start)?;
    let end = end.map(|end| parse_end(end, &start)).transpose()?;
    let end = resolve_end(&start, end)?;
    Ok((start, end))
}

fn report(changed: bool, message: &str) {
    if changed {
        println!("{}", format!("  {}", message).green());
    } else {
        println!("{}", "  Nothing to change".dimmed());
    }
}
