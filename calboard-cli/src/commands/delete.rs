use anyhow::Result;
use calboard_core::Board;
use calboard_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run<S: EventStore>(board: &mut Board<S>, id: &str) -> Result<()> {
    let title = board
        .events()
        .get(id)
        .map(|event| event.title.clone())
        .ok_or_else(|| anyhow::anyhow!("Event '{}' not found", id))?;

    board.delete_event(id)?;
    println!("{}", format!("  Deleted: {}", title).red());

    Ok(())
}
