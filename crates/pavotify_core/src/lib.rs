//! Pavotify core: history data model and the pure download-session state machine.
mod age;
mod effect;
mod entry;
mod history;
mod msg;
mod session;
mod title;
mod update;
mod view_model;

pub use age::relative_age;
pub use effect::{Notice, RejectReason, SessionEffect};
pub use entry::{EntryId, HistoryEntry, Outcome};
pub use history::{HistoryLog, HISTORY_CAP};
pub use msg::SessionMsg;
pub use session::{
    DownloadSession, Phase, PROGRESS_STEP, STATUS_AUDIO, STATUS_COMPLETED, STATUS_FAILED,
    STATUS_FINALIZING, STATUS_METADATA, STATUS_STARTING,
};
pub use title::{derive_title, FALLBACK_TITLE};
pub use update::update;
pub use view_model::SessionView;
