//! Declarative logging configuration for task execution.
//!
//! [`build_logging_config`] is a pure function turning a verbosity level and
//! a log file path into a [`LoggingConfig`] value; [`LoggingConfig::install`]
//! performs the side effects (opening the file, building the subscriber) and
//! returns a [`TaskLogHandle`].
//!
//! Each handle owns its own `tracing` dispatcher writing to its own file.
//! Installing a handle never touches process-global logging state: the
//! dispatcher only becomes active inside [`TaskLogHandle::scope`], and only
//! on the calling thread. Two tasks logging concurrently therefore write to
//! independent files instead of racing over a single global configuration.

use crate::error::{KnurlError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Dispatch, Level};

/// A declarative logging setup: what to capture and where to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Maximum level captured (events above this are discarded).
    pub level: Level,
    /// File that receives the formatted log lines.
    pub log_file: PathBuf,
}

/// Build the logging configuration for a task log file.
///
/// Pure: no filesystem access happens until [`LoggingConfig::install`].
pub fn build_logging_config(level: Level, log_file: &Path) -> LoggingConfig {
    LoggingConfig {
        level,
        log_file: log_file.to_path_buf(),
    }
}

impl LoggingConfig {
    /// Install this configuration, producing a per-task log handle.
    ///
    /// Opens the log file in append mode, creating it if absent. The parent
    /// directory must already exist.
    pub fn install(&self) -> Result<TaskLogHandle> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .map_err(|e| {
                KnurlError::UserError(format!(
                    "failed to open log file '{}': {}",
                    self.log_file.display(),
                    e
                ))
            })?;

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .finish();

        Ok(TaskLogHandle {
            dispatch: Dispatch::new(subscriber),
            log_file: self.log_file.clone(),
            level: self.level,
        })
    }
}

/// A per-task logging sink.
///
/// Holds the dispatcher and file writer for one task. The handle is inert
/// until [`TaskLogHandle::scope`] is entered; dropping it releases the file.
#[derive(Debug, Clone)]
pub struct TaskLogHandle {
    dispatch: Dispatch,
    log_file: PathBuf,
    level: Level,
}

impl TaskLogHandle {
    /// Run a closure with this handle installed as the thread-default
    /// `tracing` subscriber.
    ///
    /// Every `tracing` event emitted by the closure (and anything it calls)
    /// lands in this task's log file, subject to the configured level.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Path of the log file this handle writes to.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Maximum level captured by this handle.
    pub fn level(&self) -> Level {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn build_logging_config_is_pure() {
        let config = build_logging_config(Level::DEBUG, Path::new("/nonexistent/task.log"));

        // Nothing was created; the config is just data.
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.log_file, PathBuf::from("/nonexistent/task.log"));
        assert!(!config.log_file.exists());
    }

    #[test]
    fn install_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("task.log");

        let handle = build_logging_config(Level::INFO, &log_file).install().unwrap();

        assert!(log_file.exists());
        assert_eq!(handle.log_file(), log_file);
        assert_eq!(handle.level(), Level::INFO);
    }

    #[test]
    fn install_fails_without_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("missing").join("task.log");

        let result = build_logging_config(Level::INFO, &log_file).install();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to open log file"));
    }

    #[test]
    fn scope_captures_events_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("task.log");
        let handle = build_logging_config(Level::INFO, &log_file).install().unwrap();

        handle.scope(|| {
            tracing::info!("captured line");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("captured line"));
    }

    #[test]
    fn scope_filters_events_above_level() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("task.log");
        let handle = build_logging_config(Level::INFO, &log_file).install().unwrap();

        handle.scope(|| {
            tracing::debug!("filtered line");
            tracing::info!("kept line");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(!content.contains("filtered line"));
        assert!(content.contains("kept line"));
    }

    #[test]
    fn debug_level_captures_debug_events() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("task.log");
        let handle = build_logging_config(Level::DEBUG, &log_file).install().unwrap();

        handle.scope(|| {
            tracing::debug!("verbose line");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("verbose line"));
    }

    #[test]
    fn two_handles_write_to_independent_files() {
        let temp_dir = TempDir::new().unwrap();
        let first_file = temp_dir.path().join("first.log");
        let second_file = temp_dir.path().join("second.log");

        let first = build_logging_config(Level::INFO, &first_file).install().unwrap();
        let second = build_logging_config(Level::INFO, &second_file).install().unwrap();

        first.scope(|| tracing::info!("from first"));
        second.scope(|| tracing::info!("from second"));

        let first_content = std::fs::read_to_string(&first_file).unwrap();
        let second_content = std::fs::read_to_string(&second_file).unwrap();
        assert!(first_content.contains("from first"));
        assert!(!first_content.contains("from second"));
        assert!(second_content.contains("from second"));
        assert!(!second_content.contains("from first"));
    }
}
