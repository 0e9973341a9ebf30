//! Logging lifecycle for tasks.
//!
//! `initialize_logging` must complete before any log lines from the task's
//! execution are written and before `get_logs` is called; that ordering is
//! the caller's responsibility. Each task owns its own log handle, so two
//! tasks initializing logging concurrently write to independent files.

use super::{Task, log_file_name};
use crate::error::{KnurlError, Result};
use crate::logging::build_logging_config;
use tracing::Level;

impl Task {
    /// Directory holding this task's log file, derived from the session id.
    pub fn log_dir(&self) -> std::path::PathBuf {
        self.log_root.join(&self.session_id)
    }

    /// Path of this task's log file.
    ///
    /// A deterministic function of the session id and log root: the same
    /// task always reads and writes the same path.
    pub fn log_file_path(&self) -> std::path::PathBuf {
        self.log_dir().join(log_file_name(&self.session_id))
    }

    /// Initialize logging for the task by creating a log file in the task's
    /// log directory. If the directory does not exist, it is created.
    ///
    /// Verbosity is debug when the task was constructed with `verbose`, else
    /// info. Safe to call more than once; the log handle is rebuilt and the
    /// existing directory and file are reused.
    pub fn initialize_logging(&mut self) -> Result<()> {
        let log_dir = self.log_dir();
        std::fs::create_dir_all(&log_dir).map_err(|e| {
            KnurlError::UserError(format!(
                "failed to create task log directory '{}': {}",
                log_dir.display(),
                e
            ))
        })?;

        let level = if self.params().verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let config = build_logging_config(level, &self.log_file_path());
        let handle = config.install()?;

        handle.scope(|| tracing::debug!("logging initialized"));
        self.log_handle = Some(handle);
        Ok(())
    }

    /// Check whether `initialize_logging` has completed for this task.
    pub fn logging_initialized(&self) -> bool {
        self.log_handle.is_some()
    }

    /// Run a closure with this task's log sink installed as the
    /// thread-default `tracing` subscriber.
    ///
    /// Fails when logging was never initialized.
    pub fn log_scope<T>(&self, f: impl FnOnce() -> T) -> Result<T> {
        match &self.log_handle {
            Some(handle) => Ok(handle.scope(f)),
            None => Err(KnurlError::UserError(format!(
                "logging has not been initialized for task '{}'.\n\
                 Fix: call initialize_logging() before executing the task.",
                self.session_id
            ))),
        }
    }

    /// Get the logs for the task.
    ///
    /// Reads and returns the full textual content of the log file. Fails
    /// with [`KnurlError::LogNotFound`] when the file does not exist, e.g.
    /// when logging was never initialized or the file was removed.
    pub fn get_logs(&self) -> Result<String> {
        let log_file = self.log_file_path();

        if !log_file.exists() {
            return Err(KnurlError::LogNotFound(log_file));
        }

        std::fs::read_to_string(&log_file).map_err(|e| {
            KnurlError::UserError(format!(
                "failed to read log file '{}': {}",
                log_file.display(),
                e
            ))
        })
    }
}
