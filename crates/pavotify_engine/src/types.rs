use pavotify_core::{HistoryEntry, Notice, RejectReason, SessionView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Session snapshot after a state change.
    Progress(SessionView),
    Notice(Notice),
}

/// Result of one `start` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    /// The session settled; the entry's outcome says whether it succeeded or failed.
    Completed(HistoryEntry),
    /// Nothing ran and nothing was recorded.
    Rejected(RejectReason),
}

impl SessionResult {
    pub fn entry(&self) -> Option<&HistoryEntry> {
        match self {
            SessionResult::Completed(entry) => Some(entry),
            SessionResult::Rejected(_) => None,
        }
    }
}
