//! Interactive session.
//!
//! The board (and with it the undo history) lives until the session ends.
//! Lines are either key chords (`ctrl+z`, `cmd+shift+z`) or commands.

use anyhow::Result;
use calboard_core::Board;
use calboard_core::config::CalBoardConfig;
use calboard_core::shortcut::KeyChord;
use calboard_core::store::EventStore;
use clap::{Parser, Subcommand};
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::EditCommand;
use crate::utils::args::split_args;

#[derive(Parser)]
#[command(no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// List every slot
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the event a slot belongs to
    Show { slot: String },
    /// Write all events to a JSON file
    Export {
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// End the session
    #[command(alias = "exit")]
    Quit,
    #[command(flatten)]
    Edit(EditCommand),
}

enum Flow {
    Continue,
    Quit,
}

pub fn run<S: EventStore>(board: &mut Board<S>, config: &CalBoardConfig) -> Result<()> {
    println!(
        "{}",
        "calboard session. Type `help` for commands, `quit` to leave.".dimmed()
    );

    loop {
        let line: String = Input::new()
            .with_prompt("calboard")
            .allow_empty(true)
            .interact_text()?;

        match handle_line(board, config, line.trim()) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("  {}", format!("{:#}", e).red()),
        }
    }

    Ok(())
}

fn handle_line<S: EventStore>(
    board: &mut Board<S>,
    config: &CalBoardConfig,
    line: &str,
) -> Result<Flow> {
    if line.is_empty() {
        return Ok(Flow::Continue);
    }

    if line.contains('+') && !line.contains(char::is_whitespace) {
        let chord: KeyChord = line.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        match board.handle_shortcut(&chord)? {
            Some(action) => {
                report_history(&action.to_string(), board.can_undo(), board.can_redo())
            }
            None => println!("{}", format!("  {} is not bound", line).dimmed()),
        }
        return Ok(Flow::Continue);
    }

    let args = split_args(line).map_err(|e| anyhow::anyhow!(e))?;
    let parsed = match SessionLine::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            // Help and usage errors are printed, not treated as failures
            e.print()?;
            return Ok(Flow::Continue);
        }
    };

    match parsed.command {
        SessionCommand::List { json } => super::list::run(board, json)?,
        SessionCommand::Show { slot } => super::show::run(board, &slot)?,
        SessionCommand::Export { output } => super::transfer::export(board, output.as_deref())?,
        SessionCommand::Undo => {
            if board.undo()? {
                report_history("undo", board.can_undo(), board.can_redo());
            } else {
                println!("{}", "  Nothing to undo".dimmed());
            }
        }
        SessionCommand::Redo => {
            if board.redo()? {
                report_history("redo", board.can_undo(), board.can_redo());
            } else {
                println!("{}", "  Nothing to redo".dimmed());
            }
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
        SessionCommand::Edit(command) => super::run_edit(board, config, command)?,
    }

    Ok(Flow::Continue)
}

fn report_history(action: &str, can_undo: bool, can_redo: bool) {
    let mut status = Vec::new();
    if can_undo {
        status.push("undo");
    }
    if can_redo {
        status.push("redo");
    }
    let status = if status.is_empty() {
        "nothing left".to_string()
    } else {
        format!("can {}", status.join("/"))
    };

    println!("  {} {}", action.green(), format!("({})", status).dimmed());
}
