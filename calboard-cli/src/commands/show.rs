use anyhow::Result;
use calboard_core::Board;
use calboard_core::slot::SlotKey;
use calboard_core::store::EventStore;

use crate::render::Render;

pub fn run<S: EventStore>(board: &Board<S>, slot: &str) -> Result<()> {
    slot.parse::<SlotKey>()?;

    match board.resolve_click(slot) {
        Some(event) => {
            println!("{}", event.render());
            Ok(())
        }
        None => anyhow::bail!("No event has a slot '{}'", slot),
    }
}
