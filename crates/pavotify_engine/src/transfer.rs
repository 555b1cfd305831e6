use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use pavotify_logging::{pavo_debug, pavo_info, pavo_warn};
use thiserror::Error;
use tokio::process::Command;

use crate::schedule::Scheduler;

#[derive(Debug, Error)]
pub enum TransferFault {
    #[error("{program} is not installed; install it first")]
    ToolMissing { program: String },
    #[error("{program} exited with {status}: {stderr}")]
    ExitFailure {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("could not prepare destination {path}: {source}")]
    Destination {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Other(String),
}

/// Moves the media at `source_url` into `destination_path`. Invoked once per session.
#[async_trait::async_trait]
pub trait Transfer: Send + Sync {
    async fn perform(&self, source_url: &str, destination_path: &str)
        -> Result<(), TransferFault>;
}

/// Stand-in backend: waits a fixed delay on the scheduler and always succeeds.
pub struct SimulatedTransfer {
    scheduler: Arc<dyn Scheduler>,
    delay: Duration,
}

impl SimulatedTransfer {
    pub fn new(scheduler: Arc<dyn Scheduler>, delay: Duration) -> Self {
        Self { scheduler, delay }
    }
}

#[async_trait::async_trait]
impl Transfer for SimulatedTransfer {
    async fn perform(
        &self,
        source_url: &str,
        destination_path: &str,
    ) -> Result<(), TransferFault> {
        pavo_debug!(
            "Simulating transfer url={} dest={} delay={:?}",
            source_url,
            destination_path,
            self.delay
        );
        self.scheduler.sleep(self.delay).await;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotdlSettings {
    pub program: String,
    pub format: String,
    pub bitrate: String,
}

impl Default for SpotdlSettings {
    fn default() -> Self {
        Self {
            program: "spotdl".to_string(),
            format: "mp3".to_string(),
            bitrate: "320k".to_string(),
        }
    }
}

/// Arguments passed to spotdl for one download.
pub fn spotdl_args(
    source_url: &str,
    destination_path: &str,
    settings: &SpotdlSettings,
) -> Vec<String> {
    vec![
        source_url.to_string(),
        "--output".to_string(),
        destination_path.to_string(),
        "--format".to_string(),
        settings.format.clone(),
        "--bitrate".to_string(),
        settings.bitrate.clone(),
    ]
}

/// Reports whether `spotdl --version` runs successfully.
pub async fn spotdl_available(settings: &SpotdlSettings) -> bool {
    match Command::new(&settings.program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
    {
        Ok(output) => output.status.success(),
        Err(err) => {
            pavo_debug!("{} --version failed: {}", settings.program, err);
            false
        }
    }
}

/// Runs the external spotdl tool.
#[derive(Debug, Clone, Default)]
pub struct SpotdlTransfer {
    settings: SpotdlSettings,
}

impl SpotdlTransfer {
    pub fn new(settings: SpotdlSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Transfer for SpotdlTransfer {
    async fn perform(
        &self,
        source_url: &str,
        destination_path: &str,
    ) -> Result<(), TransferFault> {
        let program = self.settings.program.clone();
        if !spotdl_available(&self.settings).await {
            return Err(TransferFault::ToolMissing { program });
        }

        tokio::fs::create_dir_all(destination_path)
            .await
            .map_err(|source| TransferFault::Destination {
                path: destination_path.to_string(),
                source,
            })?;

        let args = spotdl_args(source_url, destination_path, &self.settings);
        pavo_info!("Running {} {}", program, args.join(" "));
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| TransferFault::Io {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            pavo_warn!("{} failed with {}: {}", program, output.status, stderr);
            Err(TransferFault::ExitFailure {
                program,
                status: output.status.to_string(),
                stderr,
            })
        }
    }
}
