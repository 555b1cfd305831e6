use std::fmt;

use crate::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// The start request was refused; nothing else follows.
    Reject(RejectReason),
    /// Invoke the transfer primitive once, then report back.
    BeginTransfer {
        source_url: String,
        destination_path: String,
    },
    /// Wait one step interval, then send `StepElapsed`.
    WaitStep,
    /// Append the terminal outcome to the history.
    Record {
        source_url: String,
        destination_path: String,
        outcome: Outcome,
    },
    Notify(Notice),
    /// Send `ResetElapsed`, after the settle delay when `after_display` is set.
    ScheduleReset { after_display: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingInput,
    AlreadyRunning,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingInput => write!(f, "missing url or destination folder"),
            RejectReason::AlreadyRunning => write!(f, "a download is already running"),
        }
    }
}

/// User-facing notification. Has no effect on session or history state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DownloadCompleted { title: String },
    DownloadFailed { reason: String },
    MissingInput,
    FolderSelected { path: String },
    HistoryCleared,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::DownloadFailed { .. } | Notice::MissingInput)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DownloadCompleted { title } => write!(f, "Downloaded {title}"),
            Notice::DownloadFailed { reason } => write!(f, "Download failed: {reason}"),
            Notice::MissingInput => {
                write!(f, "Please enter a URL and select a destination folder")
            }
            Notice::FolderSelected { path } => write!(f, "Folder selected: {path}"),
            Notice::HistoryCleared => write!(f, "History cleared"),
        }
    }
}
