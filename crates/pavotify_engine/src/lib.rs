//! Pavotify engine: persistence, transfer backends and session effect execution.
mod controller;
mod history;
mod ids;
mod persist;
mod schedule;
mod sink;
mod slot;
mod transfer;
mod types;

pub use controller::{SessionController, SessionSettings};
pub use history::{load_history, HistoryStore};
pub use ids::EntryIdGenerator;
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use schedule::{Scheduler, TokioScheduler, VirtualScheduler};
pub use sink::{ChannelProgressSink, NullProgressSink, ProgressSink};
pub use slot::{FileSlot, MemorySlot, Slot, SlotError, HISTORY_SLOT_KEY};
pub use transfer::{
    spotdl_args, spotdl_available, SimulatedTransfer, SpotdlSettings, SpotdlTransfer, Transfer,
    TransferFault,
};
pub use types::{EngineEvent, SessionResult};
