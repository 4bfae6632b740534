//! TUI rendering traits for calboard types.
//!
//! Extension traits that add colored terminal rendering to calboard-core
//! types using owo_colors.

use calboard_core::event::{Event, TimeSlot};
use calboard_core::slot::FlattenedSlot;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for FlattenedSlot {
    fn render(&self) -> String {
        let start = wall_clock(self.start, self.all_day);
        let time = format_time(start, self.all_day);
        let range = match self.end.map(|end| wall_clock(end, self.all_day)) {
            Some(end) if end.date() != start.date() => {
                format!(" → {}", end.format("%a %b %-d"))
            }
            Some(end) if !self.all_day => format!(" → {}", end.format("%H:%M")),
            _ => String::new(),
        };
        let id = format!("[{}]", self.composite_id());

        format!(
            "  {} {} {}{} {}",
            swatch(self.color.as_deref()),
            time,
            self.title,
            range.dimmed(),
            id.dimmed()
        )
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            swatch(self.color.as_deref()),
            self.title.bold(),
            format!("({})", self.id).dimmed()
        )];

        for (index, slot) in self.time_slots.iter().enumerate() {
            lines.push(format!(
                "   {} {}",
                format!("#{}", index).dimmed(),
                render_slot(slot, self.all_day)
            ));
        }

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("   {}", description.italic()));
        }

        lines.join("\n")
    }
}

fn render_slot(slot: &TimeSlot, all_day: bool) -> String {
    let fmt = if all_day { "%Y-%m-%d" } else { "%Y-%m-%d %H:%M" };
    let start = wall_clock(slot.start, all_day).format(fmt);
    match slot.end {
        Some(end) => format!("{} → {}", start, wall_clock(end, all_day).format(fmt)),
        None => start.to_string(),
    }
}

/// How an instant reads on the calendar: all-day dates are UTC midnights,
/// timed slots show local time.
pub fn wall_clock(at: DateTime<Utc>, all_day: bool) -> NaiveDateTime {
    if all_day {
        at.naive_utc()
    } else {
        at.with_timezone(&Local).naive_local()
    }
}

/// A colored dot for `#rrggbb` colors, a plain dot otherwise.
fn swatch(color: Option<&str>) -> String {
    match color.and_then(parse_hex_color) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => "●".dimmed().to_string(),
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Format the time portion of a slot (e.g. "15:00" or "all-day")
fn format_time(start: NaiveDateTime, all_day: bool) -> String {
    if all_day {
        "all-day".to_string()
    } else {
        format!("{:>7}", start.format("%H:%M"))
    }
}
