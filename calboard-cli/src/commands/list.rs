use anyhow::Result;
use calboard_core::Board;
use calboard_core::store::EventStore;
use chrono::Local;
use owo_colors::OwoColorize;

use crate::render::{Render, format_date_label, wall_clock};

pub fn run<S: EventStore>(board: &Board<S>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&board.render_events())?);
        return Ok(());
    }

    let mut slots = board.flatten();
    if slots.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Stable, so slots starting together keep collection order
    slots.sort_by_key(|slot| slot.start);

    let today = Local::now().date_naive();
    let mut current_date = None;

    for slot in &slots {
        let date = wall_clock(slot.start, slot.all_day).date();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date, today).bold());
            current_date = Some(date);
        }

        println!("{}", slot.render());
    }

    Ok(())
}
