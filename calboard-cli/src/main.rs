mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calboard_core::Board;
use calboard_core::config::CalBoardConfig;
use calboard_core::store::FileStore;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::EditCommand;

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "A calendar of multi-slot events with undo/redo")]
struct Cli {
    /// Use this data directory instead of the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every slot, grouped by day
    List {
        /// Print the slots as renderer JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Show the event a slot belongs to
    Show {
        /// Slot id as shown by `list` (e.g. "1700000000000-0")
        slot: String,
    },
    /// Write all events to a JSON file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start an interactive session with undo/redo
    Session,
    /// Show or change configuration
    Config {
        /// Color for new events without one
        #[arg(long)]
        set_color: Option<String>,

        /// Name of the event file inside the data directory
        #[arg(long)]
        set_storage_key: Option<String>,

        /// Data directory (e.g. "~/calboard")
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Seed sample events into an empty calendar
        #[arg(long)]
        set_seed_defaults: Option<bool>,
    },
    #[command(flatten)]
    Edit(EditCommand),
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = CalBoardConfig::load().context("Failed to load config")?;

    // --data-dir applies to this run only and is never saved
    let mut run_config = config.clone();
    if let Some(data_dir) = cli.data_dir {
        run_config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Config {
            set_color,
            set_storage_key,
            set_data_dir,
            set_seed_defaults,
        } => commands::config::run(config, commands::config::ConfigChanges {
            color: set_color,
            storage_key: set_storage_key,
            data_dir: set_data_dir,
            seed_defaults: set_seed_defaults,
        }),
        Commands::List { json } => commands::list::run(&open_board(&run_config)?, json),
        Commands::Show { slot } => commands::show::run(&open_board(&run_config)?, &slot),
        Commands::Export { output } => {
            commands::transfer::export(&open_board(&run_config)?, output.as_deref())
        }
        Commands::Session => commands::session::run(&mut open_board(&run_config)?, &run_config),
        Commands::Edit(command) => {
            commands::run_edit(&mut open_board(&run_config)?, &run_config, command)
        }
    }
}

/// Log to stderr, filtered by `CALBOARD_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CALBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_board(config: &CalBoardConfig) -> Result<Board<FileStore>> {
    let store = FileStore::from_config(config);
    let path = store.path().display().to_string();
    debug!(path = %path, seed = config.seed_defaults, "Opening event store");

    Board::open(store, config.seed_defaults, Utc::now())
        .with_context(|| format!("Failed to load events from {}", path))
}
