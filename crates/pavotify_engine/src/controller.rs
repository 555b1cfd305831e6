use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pavotify_core::{
    update, DownloadSession, HistoryEntry, Outcome, Phase, SessionEffect, SessionMsg, SessionView,
};
use pavotify_logging::{pavo_debug, pavo_error, pavo_info, pavo_warn};

use crate::history::HistoryStore;
use crate::ids::EntryIdGenerator;
use crate::schedule::Scheduler;
use crate::sink::ProgressSink;
use crate::transfer::Transfer;
use crate::{EngineEvent, SessionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Delay before each 10% progress step.
    pub step_interval: Duration,
    /// How long a succeeded session stays on display before resetting.
    pub settle_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(200),
            settle_delay: Duration::from_millis(2000),
        }
    }
}

/// Runs download sessions one at a time and records each outcome in the history.
pub struct SessionController {
    session: Mutex<DownloadSession>,
    history: Arc<HistoryStore>,
    transfer: Arc<dyn Transfer>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn ProgressSink>,
    ids: EntryIdGenerator,
    settings: SessionSettings,
}

impl SessionController {
    pub fn new(
        history: Arc<HistoryStore>,
        transfer: Arc<dyn Transfer>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn ProgressSink>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            session: Mutex::new(DownloadSession::new()),
            history,
            transfer,
            scheduler,
            sink,
            ids: EntryIdGenerator::new(),
            settings,
        }
    }

    pub fn view(&self) -> SessionView {
        self.lock().view()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Runs one session to completion. Returns once the session is back to idle.
    ///
    /// A call made while another session is active is rejected with
    /// `RejectReason::AlreadyRunning`. Dropping the returned future before it
    /// completes puts the session back to idle; an entry exists only if the
    /// session had already settled.
    pub async fn start(&self, source_url: &str, destination_path: &str) -> SessionResult {
        pavo_info!(
            "Session start requested url={} dest={}",
            source_url,
            destination_path
        );
        let mut inbox = VecDeque::from([SessionMsg::StartRequested {
            source_url: source_url.to_string(),
            destination_path: destination_path.to_string(),
        }]);
        let mut guard = ResetOnDrop {
            controller: self,
            armed: false,
        };

        while let Some(msg) = inbox.pop_front() {
            let mut effects = self.dispatch(msg).into_iter();
            while let Some(effect) = effects.next() {
                match effect {
                    SessionEffect::Reject(reason) => {
                        pavo_warn!("Session rejected: {}", reason);
                        return SessionResult::Rejected(reason);
                    }
                    SessionEffect::BeginTransfer {
                        source_url,
                        destination_path,
                    } => {
                        guard.armed = true;
                        inbox.push_back(self.run_transfer(&source_url, &destination_path).await);
                    }
                    SessionEffect::WaitStep => {
                        self.scheduler.sleep(self.settings.step_interval).await;
                        inbox.push_back(SessionMsg::StepElapsed);
                    }
                    SessionEffect::Record {
                        source_url,
                        destination_path,
                        outcome,
                    } => {
                        let entry = self.record(source_url, destination_path, outcome);
                        self.wind_down(effects).await;
                        return SessionResult::Completed(entry);
                    }
                    SessionEffect::Notify(notice) => {
                        self.sink.emit(EngineEvent::Notice(notice));
                    }
                    SessionEffect::ScheduleReset { after_display } => {
                        self.reset(after_display).await;
                    }
                }
            }
        }

        // The guard resets the stalled session once this returns.
        pavo_error!("Session stopped without an outcome; recording it as failed");
        let entry = self.record(
            source_url.to_string(),
            destination_path.to_string(),
            Outcome::Failed,
        );
        SessionResult::Completed(entry)
    }

    async fn run_transfer(&self, source_url: &str, destination_path: &str) -> SessionMsg {
        match self.transfer.perform(source_url, destination_path).await {
            Ok(()) => SessionMsg::TransferSucceeded,
            Err(fault) => {
                pavo_warn!("Transfer failed for {}: {}", source_url, fault);
                SessionMsg::TransferFailed {
                    reason: fault.to_string(),
                }
            }
        }
    }

    /// Runs the effects that follow a recorded outcome: notices and the reset.
    async fn wind_down(&self, effects: std::vec::IntoIter<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::Notify(notice) => self.sink.emit(EngineEvent::Notice(notice)),
                SessionEffect::ScheduleReset { after_display } => self.reset(after_display).await,
                other => pavo_warn!("Ignoring {:?} after the session settled", other),
            }
        }
    }

    async fn reset(&self, after_display: bool) {
        if after_display {
            self.scheduler.sleep(self.settings.settle_delay).await;
        }
        for effect in self.dispatch(SessionMsg::ResetElapsed) {
            pavo_warn!("Ignoring {:?} emitted by the reset", effect);
        }
    }

    fn dispatch(&self, msg: SessionMsg) -> Vec<SessionEffect> {
        let (view, effects) = {
            let mut guard = self.lock();
            let before = guard.view();
            let session = std::mem::take(&mut *guard);
            let (session, effects) = update(session, msg);
            let view = session.view();
            *guard = session;
            ((view != before).then_some(view), effects)
        };

        if let Some(view) = view {
            pavo_debug!(
                "Session {:?} {}% {}",
                view.phase,
                view.progress_percent,
                view.status_message
            );
            self.sink.emit(EngineEvent::Progress(view));
        }
        effects
    }

    fn record(
        &self,
        source_url: String,
        destination_path: String,
        outcome: Outcome,
    ) -> HistoryEntry {
        let now = self.scheduler.now_millis();
        let id = self.ids.next(now);
        let entry = HistoryEntry::new(id, source_url, destination_path, now, outcome);
        pavo_info!(
            "Session settled id={} outcome={} title={}",
            entry.id(),
            entry.outcome(),
            entry.display_title()
        );
        self.history.append(entry.clone());
        entry
    }

    fn lock(&self) -> MutexGuard<'_, DownloadSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts an accepted session back to idle if `start` ends, or is dropped,
/// before the session has reset on its own.
struct ResetOnDrop<'a> {
    controller: &'a SessionController,
    armed: bool,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let view = {
            let mut session = self.controller.lock();
            if session.phase() == Phase::Idle {
                return;
            }
            *session = DownloadSession::new();
            session.view()
        };
        pavo_warn!("Session abandoned before it reset; forcing idle");
        self.controller.sink.emit(EngineEvent::Progress(view));
    }
}
