//! Global calboard configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STORAGE_KEY;
use crate::error::{CalBoardError, CalBoardResult};

static DEFAULT_DATA_DIR: &str = "~/calboard";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_seed_defaults() -> bool {
    true
}

/// Configuration at ~/.config/calboard/config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalBoardConfig {
    /// Where the event file lives. `~` is expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the event file inside `data_dir` (without `.json`).
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Seed sample events when nothing has been saved yet.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,

    /// Color applied to new events that don't pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
}

impl Default for CalBoardConfig {
    fn default() -> Self {
        CalBoardConfig {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            seed_defaults: default_seed_defaults(),
            default_color: None,
        }
    }
}

impl CalBoardConfig {
    pub fn config_path() -> CalBoardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalBoardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first use.
    pub fn load() -> CalBoardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalBoardResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| CalBoardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalBoardError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Save the current config to ~/.config/calboard/config.toml
    pub fn save(&self) -> CalBoardResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> CalBoardResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalBoardError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalBoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalBoardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# Where your events are stored:
# data_dir = \"{}\"

# File name (without .json) inside data_dir:
# storage_key = \"{}\"

# Start a fresh calendar with sample events:
# seed_defaults = true

# Color for new events that don't set one:
# default_color = \"#3788d8\"
",
            DEFAULT_DATA_DIR, DEFAULT_STORAGE_KEY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalBoardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalBoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
