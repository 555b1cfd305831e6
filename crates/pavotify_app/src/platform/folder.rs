use std::io::{self, BufRead, Write};

use pavotify_logging::pavo_warn;

/// Supplies a destination folder on request. `None` means no selection was made.
pub trait FolderPicker {
    fn pick(&mut self) -> Option<String>;
}

/// Asks for a folder on a line-oriented terminal.
pub struct PromptFolderPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptFolderPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptFolderPicker<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> FolderPicker for PromptFolderPicker<R, W> {
    fn pick(&mut self) -> Option<String> {
        let prompt = write!(self.output, "Destination folder: ").and_then(|()| self.output.flush());
        if let Err(err) = prompt {
            pavo_warn!("Could not show folder prompt: {}", err);
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let path = line.trim();
                (!path.is_empty()).then(|| path.to_string())
            }
            Err(err) => {
                pavo_warn!("Could not read folder selection: {}", err);
                None
            }
        }
    }
}

/// Fallback for hosts without any way to ask; never selects anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFolderPicker;

impl FolderPicker for NoFolderPicker {
    fn pick(&mut self) -> Option<String> {
        None
    }
}
