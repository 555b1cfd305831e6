use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pavotify_core::{EntryId, HistoryEntry, HistoryLog};
use pavotify_logging::{pavo_debug, pavo_error, pavo_info, pavo_warn};

use crate::slot::{Slot, HISTORY_SLOT_KEY};

/// Reads the persisted history. Absent, unreadable or unparsable data all yield an empty log.
pub fn load_history(slot: &dyn Slot) -> HistoryLog {
    let content = match slot.read(HISTORY_SLOT_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            pavo_debug!("No persisted history under {HISTORY_SLOT_KEY}");
            return HistoryLog::new();
        }
        Err(err) => {
            pavo_warn!("Failed to read persisted history: {}", err);
            return HistoryLog::new();
        }
    };

    match serde_json::from_str::<HistoryLog>(&content) {
        Ok(log) => {
            pavo_info!("Loaded {} history entries", log.len());
            log
        }
        Err(err) => {
            pavo_warn!("Failed to parse persisted history, starting empty: {}", err);
            HistoryLog::new()
        }
    }
}

/// Owns the history log and its slot. Every mutation rewrites the whole slot once,
/// under the same lock that guards the in-memory log.
pub struct HistoryStore {
    slot: Arc<dyn Slot>,
    log: Mutex<HistoryLog>,
}

impl HistoryStore {
    /// Opens the store, loading whatever the slot currently holds.
    pub fn open(slot: Arc<dyn Slot>) -> Self {
        let log = load_history(slot.as_ref());
        Self {
            slot,
            log: Mutex::new(log),
        }
    }

    /// Re-reads the slot, replacing the in-memory log.
    pub fn load(&self) -> HistoryLog {
        let mut guard = self.lock();
        *guard = load_history(self.slot.as_ref());
        guard.clone()
    }

    pub fn snapshot(&self) -> HistoryLog {
        self.lock().clone()
    }

    pub fn find(&self, id: &EntryId) -> Option<HistoryEntry> {
        self.lock().find(id).cloned()
    }

    pub fn append(&self, entry: HistoryEntry) -> HistoryLog {
        self.mutate(|log| {
            pavo_debug!("Appending history entry {} ({})", entry.id(), entry.outcome());
            log.prepend(entry);
        })
    }

    /// Removes `id` if present. Absent ids still rewrite the same content.
    pub fn remove(&self, id: &EntryId) -> HistoryLog {
        self.mutate(|log| {
            if !log.remove(id) {
                pavo_debug!("History entry {} not present; nothing removed", id);
            }
        })
    }

    pub fn clear(&self) -> HistoryLog {
        self.mutate(HistoryLog::clear)
    }

    fn mutate(&self, apply: impl FnOnce(&mut HistoryLog)) -> HistoryLog {
        let mut guard = self.lock();
        apply(&mut guard);
        self.persist(&guard);
        guard.clone()
    }

    fn persist(&self, log: &HistoryLog) {
        let content = match serde_json::to_string(log) {
            Ok(text) => text,
            Err(err) => {
                pavo_error!("Failed to serialize history: {}", err);
                return;
            }
        };
        if let Err(err) = self.slot.write(HISTORY_SLOT_KEY, &content) {
            pavo_error!("Failed to persist history: {}", err);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
