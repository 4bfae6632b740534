use std::path::PathBuf;

use anyhow::Result;
use calboard_core::config::CalBoardConfig;
use calboard_core::store::FileStore;
use owo_colors::OwoColorize;

pub struct ConfigChanges {
    pub color: Option<String>,
    pub storage_key: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub seed_defaults: Option<bool>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.storage_key.is_none()
            && self.data_dir.is_none()
            && self.seed_defaults.is_none()
    }
}

pub fn run(mut config: CalBoardConfig, changes: ConfigChanges) -> Result<()> {
    let config_path = CalBoardConfig::config_path()?;

    if !changes.is_empty() {
        if let Some(color) = changes.color {
            config.default_color = if color.is_empty() { None } else { Some(color) };
        }
        if let Some(storage_key) = changes.storage_key {
            if storage_key.is_empty() || storage_key.contains(['/', '\\']) {
                anyhow::bail!("Invalid storage key '{}'", storage_key);
            }
            config.storage_key = storage_key;
        }
        if let Some(data_dir) = changes.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(seed_defaults) = changes.seed_defaults {
            config.seed_defaults = seed_defaults;
        }

        config.save()?;
        println!("{}", format!("  Saved {}", config_path.display()).green());
        println!();
    }

    let store = FileStore::from_config(&config);

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", store.path().display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Seed sample events:  {}", config.seed_defaults);
    println!(
        "  Default color:       {}",
        config.default_color.as_deref().unwrap_or("none")
    );

    Ok(())
}
