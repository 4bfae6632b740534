use std::path::Path;

use anyhow::{Context, Result};
use calboard_core::Board;
use calboard_core::constants::EXPORT_FILE_NAME;
use calboard_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn export<S: EventStore>(board: &Board<S>, output: Option<&Path>) -> Result<()> {
    let path = output.unwrap_or(Path::new(EXPORT_FILE_NAME));
    let json = board.export_json()?;

    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "{}",
        format!("  Exported {} events to {}", board.events().len(), path.display()).green()
    );

    Ok(())
}

/// Replace every event with the file's contents. A malformed file changes nothing.
pub fn import<S: EventStore>(board: &mut Board<S>, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let count = board
        .import_json(&text)
        .with_context(|| format!("Could not import {}", path.display()))?;
    println!("{}", format!("  Imported {} events", count).green());

    Ok(())
}
