use std::fmt;

use serde::{Deserialize, Serialize};

use crate::title::derive_title;

/// Identifier of a history entry, stored as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Terminal result of a download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// One settled download attempt. Field names on disk are kept short
/// (`url`, `title`, `path`, `timestamp`, `status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: EntryId,
    #[serde(rename = "url")]
    source_url: String,
    #[serde(rename = "title")]
    display_title: String,
    #[serde(rename = "path")]
    destination_path: String,
    #[serde(rename = "timestamp")]
    created_at: i64,
    #[serde(rename = "status")]
    outcome: Outcome,
}

impl HistoryEntry {
    /// Builds an entry, deriving the display title from `source_url`.
    pub fn new(
        id: EntryId,
        source_url: impl Into<String>,
        destination_path: impl Into<String>,
        created_at: i64,
        outcome: Outcome,
    ) -> Self {
        let source_url = source_url.into();
        let display_title = derive_title(&source_url);
        Self {
            id,
            source_url,
            display_title,
            destination_path: destination_path.into(),
            created_at,
            outcome,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    /// Epoch milliseconds of when the attempt settled.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}
