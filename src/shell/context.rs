use std::mem;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::filesystem::{Node, Vfs, path};

/// State a command runs against: the filesystem, the working directory,
/// the session's command history and the persistence hook.
#[derive(Debug)]
pub struct ShellContext {
    vfs: Vfs,
    cwd: String,
    prev_cwd: Option<String>,
    home: String,
    started_at: Instant,
    history: Vec<String>,
    history_cleared: bool,
    persist_requested: bool,
}

impl ShellContext {
    /// Starts in `home`, or at the root when `home` is not a directory of
    /// `vfs`.
    pub fn new(vfs: Vfs, home: impl Into<String>) -> Self {
        let home = path::normalize(&home.into());
        let cwd = if vfs.lookup(&home).node.is_some_and(Node::is_directory) {
            home.clone()
        } else {
            "/".to_string()
        };

        Self {
            vfs,
            cwd,
            prev_cwd: None,
            home,
            started_at: Instant::now(),
            history: Vec::new(),
            history_cleared: false,
            persist_requested: false,
        }
    }

    /// Restores a saved working directory if it still names a directory.
    pub fn with_cwd(mut self, cwd: &str) -> Self {
        let cwd = path::normalize(cwd);
        if self.vfs.lookup(&cwd).node.is_some_and(Node::is_directory) {
            self.cwd = cwd;
        } else {
            debug!("Saved working directory {} is gone, staying in {}", cwd, self.cwd);
        }
        self
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut Vfs {
        &mut self.vfs
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Changes the working directory, remembering the old one for `cd -`.
    pub fn set_cwd(&mut self, cwd: String) {
        let previous = mem::replace(&mut self.cwd, cwd);
        self.prev_cwd = Some(previous);
    }

    pub fn prev_cwd(&self) -> Option<&str> {
        self.prev_cwd.as_deref()
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// Resolves user input against the working directory and home.
    pub fn resolve(&self, input: &str) -> String {
        path::resolve(&self.cwd, input, &self.home)
    }

    /// Time since the session started.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Seeds the history, e.g. with lines kept from earlier sessions.
    pub fn with_history(mut self, entries: impl IntoIterator<Item = String>) -> Self {
        self.history.extend(entries);
        self
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Appends a line to the history. Blank lines are not kept.
    pub fn record_history(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.history.push(line.to_string());
        }
    }

    pub fn clear_history(&mut self) {
        debug!("Clearing {} history entries", self.history.len());
        self.history.clear();
        self.history_cleared = true;
    }

    /// Returns and clears the pending history-cleared notice, so the line
    /// editor can drop its own copy.
    pub fn take_history_cleared(&mut self) -> bool {
        mem::take(&mut self.history_cleared)
    }

    /// Asks the owner of the session to persist the current state.
    pub fn request_persist(&mut self) {
        self.persist_requested = true;
    }

    /// Returns and clears the pending persistence request.
    pub fn take_persist_request(&mut self) -> bool {
        mem::take(&mut self.persist_requested)
    }
}
