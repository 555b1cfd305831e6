use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use pavotify_engine::{
    ChannelProgressSink, EngineEvent, HistoryStore, Scheduler, SessionController, SessionResult,
    SimulatedTransfer, SpotdlTransfer, TokioScheduler, Transfer,
};
use pavotify_logging::{pavo_info, pavo_warn};

use super::config::{AppConfig, TransferMode};
use super::ui;

/// Wires a session controller to the terminal: engine events are rendered on a
/// dedicated thread while the session runs on a tokio runtime.
pub struct DownloadRunner {
    runtime: tokio::runtime::Runtime,
    controller: SessionController,
    events: mpsc::Sender<EngineEvent>,
    printer: JoinHandle<()>,
}

impl DownloadRunner {
    pub fn new(config: &AppConfig, history: Arc<HistoryStore>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
        let transfer: Arc<dyn Transfer> = match config.transfer {
            TransferMode::Simulated => Arc::new(SimulatedTransfer::new(
                scheduler.clone(),
                config.transfer_delay(),
            )),
            TransferMode::Spotdl => Arc::new(SpotdlTransfer::new(config.spotdl_settings())),
        };
        pavo_info!("Using {:?} transfer backend", config.transfer);

        let (tx, rx) = mpsc::channel::<EngineEvent>();
        let controller = SessionController::new(
            history,
            transfer,
            scheduler,
            Arc::new(ChannelProgressSink::new(tx.clone())),
            config.session_settings(),
        );
        let printer = spawn_event_loop(rx);

        Ok(Self {
            runtime,
            controller,
            events: tx,
            printer,
        })
    }

    /// Sends an app-level event (folder selection and the like) to the same renderer.
    pub fn announce(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    /// Runs one session and waits until every event it produced has been rendered.
    pub fn run(self, source_url: &str, destination_path: &str) -> SessionResult {
        let result = self
            .runtime
            .block_on(self.controller.start(source_url, destination_path));

        // Dropping both senders ends the printer loop.
        drop(self.controller);
        drop(self.events);
        if self.printer.join().is_err() {
            pavo_warn!("Event printer thread panicked");
        }
        result
    }
}

fn spawn_event_loop(rx: mpsc::Receiver<EngineEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdout = io::stdout();
        for event in rx {
            let mut out = stdout.lock();
            if let Err(err) = ui::render::render_event(&mut out, &event) {
                pavo_warn!("Failed to render event: {}", err);
            }
        }
    })
}
