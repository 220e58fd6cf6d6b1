use crate::app::models::DECOMPILER_SCRIPT;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Longest path, in bytes, accepted from the settings form.
pub const MAX_PATH_LEN: usize = 1024;

/// Text shown when the form is opened.
pub const SETTINGS_FORM: &str = "RetDec Plugin Settings

Settings will be permanently stored and you will not have to fill them each time you run decompilation.

Path to retdec-decompiler.sh (unnecessary if it is in the system PATH):";

/// Result of asking the user for a decompiler path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Path(String),
    Cancelled,
}

/// Asks the user where the decompiler lives.
pub trait SettingsPrompt {
    /// Shows a message the user has to acknowledge.
    fn notify(&mut self, message: &str);

    /// Presents the settings form prefilled with `current`.
    fn ask_path(&mut self, current: &str) -> PromptOutcome;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathInputError {
    #[error("path is {len} bytes long, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Trims the raw form input and rejects anything over [`MAX_PATH_LEN`].
pub fn validate_path_input(raw: &str) -> Result<String, PathInputError> {
    let path = raw.trim();
    if path.len() > MAX_PATH_LEN {
        return Err(PathInputError::TooLong {
            len: path.len(),
            max: MAX_PATH_LEN,
        });
    }
    Ok(path.to_string())
}

/// Value the form starts with.
pub fn prefill(current: &str) -> &str {
    if current.is_empty() {
        DECOMPILER_SCRIPT
    } else {
        current
    }
}

/// Line-oriented settings form. Empty input keeps the prefilled value,
/// end of input or `:q` cancels.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                log::debug!("Failed to read settings input: {}", err);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> SettingsPrompt for TerminalPrompt<R, W> {
    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}\n", message);
        let _ = self.output.flush();
    }

    fn ask_path(&mut self, current: &str) -> PromptOutcome {
        let default = prefill(current).to_string();
        let _ = writeln!(self.output, "{}", SETTINGS_FORM);

        loop {
            let _ = write!(self.output, "RetDec file [{}]: ", default);
            let _ = self.output.flush();

            let Some(line) = self.read_line() else {
                return PromptOutcome::Cancelled;
            };
            if line.trim() == ":q" {
                return PromptOutcome::Cancelled;
            }
            match validate_path_input(&line) {
                Ok(path) if path.is_empty() => return PromptOutcome::Path(default),
                Ok(path) => return PromptOutcome::Path(path),
                Err(err) => {
                    let _ = writeln!(self.output, "Rejected: {}", err);
                }
            }
        }
    }
}
