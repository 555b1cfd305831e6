use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use pavotify_core::{EntryId, Notice, Outcome};
use pavotify_engine::{spotdl_available, EngineEvent, FileSlot, HistoryStore, SessionResult};
use pavotify_logging::pavo_info;

use super::config::{load_config, AppConfig, ConfigSource};
use super::effects::DownloadRunner;
use super::folder::{FolderPicker, NoFolderPicker, PromptFolderPicker};
use super::{logging, ui};
use crate::cli::{Cli, Command, HistoryAction};

pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let (config, source) = load_config(cli.config.as_deref())?;
    logging::initialize(cli.log.unwrap_or(config.log));
    match &source {
        ConfigSource::File(path) => pavo_info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => pavo_info!("No config file; using defaults"),
    }

    let slot = FileSlot::new(&config.data_dir);
    pavo_info!("History stored under {}", slot.dir().display());
    let history = Arc::new(HistoryStore::open(Arc::new(slot)));

    match cli.command {
        Command::Download {
            url,
            dest,
            no_prompt,
        } => {
            let mut picker: Box<dyn FolderPicker> = if no_prompt {
                Box::new(NoFolderPicker)
            } else {
                Box::new(PromptFolderPicker::stdin())
            };
            download(&config, history, &url, dest, picker.as_mut())
        }
        Command::History { action } => {
            history_command(&history, action.unwrap_or(HistoryAction::List))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => check(&config),
    }
}

fn download(
    config: &AppConfig,
    history: Arc<HistoryStore>,
    url: &str,
    dest: Option<String>,
    picker: &mut dyn FolderPicker,
) -> Result<ExitCode> {
    let runner = DownloadRunner::new(config, history)?;

    let destination = match dest {
        Some(dest) => dest,
        None => match picker.pick() {
            Some(path) => {
                runner.announce(EngineEvent::Notice(Notice::FolderSelected { path: path.clone() }));
                path
            }
            None => String::new(),
        },
    };

    let code = match runner.run(url, &destination) {
        SessionResult::Completed(entry) if entry.outcome() == Outcome::Completed => {
            ExitCode::SUCCESS
        }
        SessionResult::Completed(_) | SessionResult::Rejected(_) => ExitCode::FAILURE,
    };
    Ok(code)
}

fn history_command(history: &HistoryStore, action: HistoryAction) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match action {
        HistoryAction::List => {
            let now = Utc::now().timestamp_millis();
            ui::render::render_history(&mut out, &history.snapshot(), now)?;
        }
        HistoryAction::Remove { id } => {
            let id = EntryId::new(id);
            let existed = history.find(&id).is_some();
            history.remove(&id);
            if existed {
                writeln!(out, "Removed {id}")?;
            } else {
                writeln!(out, "No history entry with id {id}")?;
            }
        }
        HistoryAction::Clear => {
            history.clear();
            ui::render::render_notice(&mut out, &Notice::HistoryCleared)?;
        }
    }
    out.flush().context("writing to stdout")
}

fn check(config: &AppConfig) -> Result<ExitCode> {
    let settings = config.spotdl_settings();
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let available = runtime.block_on(spotdl_available(&settings));

    println!("OS: {}, Arch: {}", std::env::consts::OS, std::env::consts::ARCH);
    if available {
        println!("{} is installed", settings.program);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} is not installed; install it to use the Spotdl backend", settings.program);
        Ok(ExitCode::FAILURE)
    }
}
