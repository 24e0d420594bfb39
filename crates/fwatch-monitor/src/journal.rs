//! User-facing log sink.
//!
//! Every journal line goes to `tracing` under the `fwatch::journal` target,
//! into an in-memory history, and to the user's log file when one is open.
//! A failed file write closes the file and turns persistence off; the
//! console keeps receiving lines.

use fwatch_common::{FwatchError, JournalMode, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

struct LogFile {
    path: PathBuf,
    file: File,
}

/// Shared journal; cheap to clone behind an `Arc`.
#[derive(Default)]
pub struct Journal {
    file: Mutex<Option<LogFile>>,
    history: Mutex<Vec<String>>,
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("file", &self.file_path())
            .field("lines", &self.history.lock().len())
            .finish()
    }
}

impl Journal {
    /// A journal that only writes to the console.
    pub fn new() -> Self {
        Self::default()
    }

    /// A journal that also persists to `path`.
    pub fn with_file(path: impl AsRef<Path>, mode: JournalMode) -> Result<Self> {
        let journal = Self::new();
        journal.open_file(path, mode)?;
        Ok(journal)
    }

    /// Opens (or replaces) the log file.
    ///
    /// `Overwrite` creates or truncates. `Append` requires an existing,
    /// writable file.
    pub fn open_file(&self, path: impl AsRef<Path>, mode: JournalMode) -> Result<()> {
        let path = path.as_ref();
        let file = match mode {
            JournalMode::Overwrite => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path),
            JournalMode::Append => {
                if !path.exists() {
                    return Err(FwatchError::validation_field(
                        format!("Log file {} does not exist", path.display()),
                        "log_file",
                    ));
                }
                OpenOptions::new().append(true).open(path)
            }
        }
        .map_err(|e| {
            FwatchError::with_source(format!("Cannot open log file {}", path.display()), e)
        })?;

        *self.file.lock() = Some(LogFile {
            path: path.to_path_buf(),
            file,
        });
        Ok(())
    }

    /// Stops persisting to the log file.
    pub fn close_file(&self) {
        if let Some(mut log) = self.file.lock().take() {
            let _ = log.file.flush();
        }
    }

    /// Path of the open log file, if persistence is on.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.lock().as_ref().map(|log| log.path.clone())
    }

    /// Whether lines are being persisted.
    pub fn is_persisting(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Emits one message. Multi-line messages are written as-is.
    pub fn emit(&self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "fwatch::journal", "{}", message);

        let mut guard = self.file.lock();
        if let Some(log) = guard.as_mut() {
            let written = writeln!(log.file, "{message}").and_then(|()| log.file.flush());
            if let Err(e) = written {
                error!(
                    "Writing to log file {} failed, log persistence disabled: {}",
                    log.path.display(),
                    e
                );
                *guard = None;
            }
        }
        drop(guard);

        self.history.lock().push(message);
    }

    /// Everything emitted so far.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}
