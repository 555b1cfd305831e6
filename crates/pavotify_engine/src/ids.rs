use std::sync::atomic::{AtomicU64, Ordering};

use pavotify_core::EntryId;

/// Issues entry ids from the millisecond clock, bumping past the last id
/// when two entries settle within the same millisecond.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicU64,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, now_millis: i64) -> EntryId {
        let candidate = u64::try_from(now_millis).unwrap_or(0);
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let id = candidate.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange(last, id, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return EntryId::from(id),
                Err(current) => last = current,
            }
        }
    }
}
