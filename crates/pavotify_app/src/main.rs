//! Pavotify: paste a music URL, pick a folder, download, and keep a short history.
mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    platform::run_app(cli)
}
