use std::io::{self, Write};

use pavotify_core::{relative_age, HistoryLog, Notice, Outcome, Phase, SessionView};
use pavotify_engine::EngineEvent;

use super::constants::{BAR_WIDTH, EMPTY_HISTORY};

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn render_event(out: &mut impl Write, event: &EngineEvent) -> io::Result<()> {
    match event {
        EngineEvent::Progress(view) => render_progress(out, view),
        EngineEvent::Notice(notice) => render_notice(out, notice),
    }
}

fn render_progress(out: &mut impl Write, view: &SessionView) -> io::Result<()> {
    match view.phase {
        Phase::Running | Phase::Succeeded => {
            write!(
                out,
                "\r{} {:>3}% {:<24}",
                progress_bar(view.progress_percent, BAR_WIDTH),
                view.progress_percent,
                view.status_message
            )?;
            if view.phase == Phase::Succeeded {
                writeln!(out)?;
            }
            out.flush()
        }
        Phase::Failed => writeln!(out),
        Phase::Idle | Phase::Validating => Ok(()),
    }
}

pub fn render_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    let tag = if notice.is_error() { "error" } else { "ok" };
    writeln!(out, "{tag}: {notice}")
}

pub fn render_history(out: &mut impl Write, log: &HistoryLog, now_millis: i64) -> io::Result<()> {
    if log.is_empty() {
        return writeln!(out, "{EMPTY_HISTORY}");
    }
    writeln!(
        out,
        "{:<15} {:<9} {:>8}  {:<16} {}",
        "ID", "STATUS", "AGE", "TITLE", "FOLDER"
    )?;
    for entry in log {
        let status = match entry.outcome() {
            Outcome::Completed => "completed",
            Outcome::Failed => "failed",
        };
        writeln!(
            out,
            "{:<15} {:<9} {:>8}  {:<16} {}",
            entry.id(),
            status,
            relative_age(entry.created_at(), now_millis),
            entry.display_title(),
            entry.destination_path()
        )?;
    }
    Ok(())
}
