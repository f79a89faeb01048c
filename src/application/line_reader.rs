use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

const HISTORY_FILE: &str = "history";

/// Where interactive input comes from.
pub trait LineReader {
    /// Shows `prompt` and reads one line. End of input is
    /// `ReadlineError::Eof`, Ctrl-C is `ReadlineError::Interrupted`.
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;

    fn add_history(&mut self, line: &str);

    fn clear_history(&mut self);
}

/// Terminal line editing with a history file kept in the state directory.
pub struct Editor {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl Editor {
    pub fn open(state_dir: &Path) -> Result<Self, ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        let history_path = state_dir.join(HISTORY_FILE);

        match editor.load_history(&history_path) {
            Ok(()) => debug!("Loaded history from {}", history_path.display()),
            Err(ReadlineError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No history at {}", history_path.display());
            }
            Err(e) => warn!("Failed to load history from {}: {}", history_path.display(), e),
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Lines loaded from earlier sessions plus those added since, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.editor.history().iter().cloned().collect()
    }

    /// Writes the history file. Failures are logged, never fatal.
    pub async fn save(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!("Failed to create history directory {}: {}", parent.display(), e);
            }
        }
        match self.editor.save_history(&self.history_path) {
            Ok(()) => debug!("Saved history to {}", self.history_path.display()),
            Err(e) => warn!("Failed to save history: {}", e),
        }
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.editor.readline(prompt)
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!("Failed to add history entry: {}", e);
        }
    }

    fn clear_history(&mut self) {
        if let Err(e) = self.editor.clear_history() {
            warn!("Failed to clear history: {}", e);
        }
    }
}
