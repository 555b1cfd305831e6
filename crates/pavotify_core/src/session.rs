use crate::view_model::SessionView;

/// Percentage added by each progress step.
pub const PROGRESS_STEP: u8 = 10;

pub const STATUS_STARTING: &str = "Starting download...";
pub const STATUS_METADATA: &str = "Fetching metadata...";
pub const STATUS_AUDIO: &str = "Fetching audio...";
pub const STATUS_FINALIZING: &str = "Finalizing...";
pub const STATUS_COMPLETED: &str = "Download complete!";
pub const STATUS_FAILED: &str = "Download failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Running,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_active(self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// The single in-flight download attempt. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadSession {
    source_url: String,
    destination_path: String,
    phase: Phase,
    progress_percent: u8,
    status_message: String,
    transfer_done: bool,
    steps_taken: u8,
}

impl DownloadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn transfer_done(&self) -> bool {
        self.transfer_done
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            progress_percent: self.progress_percent,
            status_message: self.status_message.clone(),
            busy: self.phase.is_active(),
        }
    }

    pub(crate) fn begin(&mut self, source_url: String, destination_path: String) {
        self.source_url = source_url;
        self.destination_path = destination_path;
        self.phase = Phase::Validating;
        self.progress_percent = 0;
        self.status_message.clear();
        self.transfer_done = false;
        self.steps_taken = 0;
    }

    pub(crate) fn start_running(&mut self) {
        debug_assert_eq!(self.phase, Phase::Validating);
        self.phase = Phase::Running;
        self.status_message = STATUS_STARTING.to_string();
    }

    pub(crate) fn mark_transfer_done(&mut self) {
        self.transfer_done = true;
    }

    /// Moves to the next scheduled percentage and returns it.
    pub(crate) fn advance(&mut self) -> u8 {
        let percent = self.steps_taken.saturating_mul(PROGRESS_STEP).min(100);
        self.steps_taken = self.steps_taken.saturating_add(1);
        self.progress_percent = percent;
        if let Some(status) = checkpoint_status(percent) {
            self.status_message = status.to_string();
        }
        percent
    }

    pub(crate) fn succeed(&mut self) {
        self.phase = Phase::Succeeded;
        self.progress_percent = 100;
        self.status_message = STATUS_COMPLETED.to_string();
    }

    pub(crate) fn fail(&mut self) {
        self.phase = Phase::Failed;
        self.status_message = STATUS_FAILED.to_string();
    }
}

fn checkpoint_status(percent: u8) -> Option<&'static str> {
    match percent {
        30 => Some(STATUS_METADATA),
        60 => Some(STATUS_AUDIO),
        90 => Some(STATUS_FINALIZING),
        _ => None,
    }
}
