use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

/// Key under which the history log is stored.
pub const HISTORY_SLOT_KEY: &str = "pavotify-history";

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("invalid slot key {0:?}")]
    InvalidKey(String),
    #[error("failed to read slot {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write slot {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: PersistError,
    },
}

/// Durable key-value storage holding one string per key.
pub trait Slot: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Replaces the whole value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
}

/// Stores each key as `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, SlotError> {
        Ok(self.dir.join(file_name(key)?))
    }
}

fn file_name(key: &str) -> Result<String, SlotError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if valid {
        Ok(format!("{key}.json"))
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let filename = file_name(key)?;
        AtomicFileWriter::new(self.dir.clone())
            .write(&filename, value)
            .map(|_| ())
            .map_err(|source| SlotError::Write {
                key: key.to_string(),
                source,
            })
    }
}

/// In-memory slot used by tests and dry runs. Counts every write.
#[derive(Debug, Default)]
pub struct MemorySlot {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates `key` without counting a write.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.lock().values.insert(key.to_string(), value.into());
        slot
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
