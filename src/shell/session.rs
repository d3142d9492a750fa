//! Session state
//!
//! One Session per process run: the virtual filesystem, the current
//! directory, the chronological log of recognized commands, and the
//! identity the prompt renders. No ambient globals; every handler gets the
//! Session passed in.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;

use crate::fs::{Vfs, VfsPath};

pub struct Session {
    vfs: Vfs,
    cwd: VfsPath,
    history: Vec<String>,
    username: String,
    hostname: String,
    started: Instant,
    log_path: Option<PathBuf>,
}

impl Session {
    pub fn new(
        vfs: Vfs,
        username: impl Into<String>,
        hostname: impl Into<String>,
        log_path: Option<PathBuf>,
    ) -> Self {
        Self {
            vfs,
            cwd: VfsPath::root(),
            history: Vec::new(),
            username: username.into(),
            hostname: hostname.into(),
            started: Instant::now(),
            log_path,
        }
    }

    /// `user@host:cwd$ ` — cwd is segment-joined with no leading
    /// separator, so the root renders as the empty string and the prompt
    /// shows just `$` after the colon.
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.username,
            self.hostname,
            self.cwd.display()
        )
    }

    /// Append a recognized command line to the history and the audit log
    /// file. Called on recognition, before the handler runs; failures of
    /// the handler do not unrecord the line. Audit-log write failures are
    /// ignored: the log is a convenience, not state.
    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
        if let Some(path) = &self.log_path {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "{} {}", stamp, line);
            }
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    pub fn set_cwd(&mut self, path: VfsPath) {
        self.cwd = path;
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut Vfs {
        &mut self.vfs
    }

    /// Printed by `exit` (and on EOF).
    pub fn summary(&self) -> String {
        format!(
            "Session lasted {:.2} seconds",
            self.started.elapsed().as_secs_f64()
        )
    }
}
