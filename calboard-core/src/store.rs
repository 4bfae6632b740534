//! Persistence for the event collection.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::codec::{decode_stored, encode_stored};
use crate::config::CalBoardConfig;
use crate::defaults::seed_events;
use crate::error::CalBoardResult;
use crate::event::EventCollection;

/// Where the collection is loaded from at startup and saved to after every commit.
pub trait EventStore {
    /// `None` when nothing has been saved yet.
    fn load(&self) -> CalBoardResult<Option<EventCollection>>;

    fn save(&self, events: &EventCollection) -> CalBoardResult<()>;
}

/// A single JSON file per storage key: `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path, storage_key: &str) -> Self {
        FileStore {
            path: data_dir.join(format!("{}.json", storage_key)),
        }
    }

    pub fn from_config(config: &CalBoardConfig) -> Self {
        Self::new(&config.data_path(), &config.storage_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventStore for FileStore {
    fn load(&self) -> CalBoardResult<Option<EventCollection>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&self.path)?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(decode_stored(&content))),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    "Stored events are not UTF-8, starting with an empty calendar"
                );
                Ok(Some(EventCollection::default()))
            }
        }
    }

    fn save(&self, events: &EventCollection) -> CalBoardResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, encode_stored(events)?)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Keeps the serialized collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text, as if a previous session had written it.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryStore {
            contents: RefCell::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> CalBoardResult<Option<EventCollection>> {
        Ok(self.contents.borrow().as_deref().map(decode_stored))
    }

    fn save(&self, events: &EventCollection) -> CalBoardResult<()> {
        *self.contents.borrow_mut() = Some(encode_stored(events)?);
        Ok(())
    }
}

/// The stored collection, or sample events (when `seed` is set) if nothing
/// was stored yet. Stored text that cannot be decoded loads as empty.
pub fn load_or_seed<S: EventStore>(
    store: &S,
    seed: bool,
    now: DateTime<Utc>,
) -> CalBoardResult<EventCollection> {
    match store.load()? {
        Some(events) => Ok(events),
        None if seed => Ok(seed_events(now)),
        None => Ok(EventCollection::default()),
    }
}
