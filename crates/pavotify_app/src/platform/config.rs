use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pavotify_engine::{SessionSettings, SpotdlSettings};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "pavotify.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransferMode {
    /// Fixed delay, always succeeds.
    #[default]
    Simulated,
    /// Hand the URL to the external spotdl tool.
    Spotdl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotdlConfig {
    pub program: String,
    pub format: String,
    pub bitrate: String,
}

impl Default for SpotdlConfig {
    fn default() -> Self {
        let defaults = SpotdlSettings::default();
        Self {
            program: defaults.program,
            format: defaults.format,
            bitrate: defaults.bitrate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the history slot.
    pub data_dir: PathBuf,
    pub transfer: TransferMode,
    pub step_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub transfer_delay_ms: u64,
    pub spotdl: SpotdlConfig,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionSettings::default();
        Self {
            data_dir: PathBuf::from(".pavotify"),
            transfer: TransferMode::default(),
            step_interval_ms: millis(session.step_interval),
            settle_delay_ms: millis(session.settle_delay),
            transfer_delay_ms: 100,
            spotdl: SpotdlConfig::default(),
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            step_interval: Duration::from_millis(self.step_interval_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }

    pub fn transfer_delay(&self) -> Duration {
        Duration::from_millis(self.transfer_delay_ms)
    }

    pub fn spotdl_settings(&self) -> SpotdlSettings {
        SpotdlSettings {
            program: self.spotdl.program.clone(),
            format: self.spotdl.format.clone(),
            bitrate: self.spotdl.bitrate.clone(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Loads the config from `explicit`, else `./pavotify.ron` when it exists, else defaults.
///
/// An explicit path that cannot be read, or any file that fails to parse, is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.is_file() {
                return Ok((AppConfig::default(), ConfigSource::Defaults));
            }
            default_path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok((config, ConfigSource::File(path)))
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(ron::from_str(content)?)
}
