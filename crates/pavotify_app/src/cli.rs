use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::platform::logging::LogDestination;

/// Download music from a URL into a folder and keep a history of past downloads.
#[derive(Parser, Debug)]
#[command(name = "pavotify", version, about, long_about = None)]
pub struct Cli {
    /// Path to a RON config file. Defaults to ./pavotify.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes. Overrides the config file.
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogDestination>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download one URL into a destination folder.
    Download {
        url: String,
        /// Destination folder. Prompted for when omitted.
        #[arg(long)]
        dest: Option<String>,
        /// Never prompt for a folder.
        #[arg(long)]
        no_prompt: bool,
    },
    /// Show or edit the download history.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Report whether spotdl is installed, plus basic system info.
    Check,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// List entries, newest first.
    List,
    /// Delete one entry by id.
    Remove { id: String },
    /// Delete every entry.
    Clear,
}
