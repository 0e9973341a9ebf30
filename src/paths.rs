//! Project path resolution for knurl.
//!
//! This module provides the "environment resolution" layer that finds the
//! project root from any working directory and derives the fixed knurl
//! directory layout from it:
//!
//! - `{root}/src` - the project source root
//! - `{root}/.knurl` - knurl state directory
//! - `{root}/.knurl/tasks/{session_id}` - per-session task log directories
//! - `{root}/.knurl/agents.yaml` - optional profile overlay file
//!
//! All lookups are pure: they inspect the filesystem but never create or
//! modify anything.

use crate::error::{KnurlError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Knurl state directory name relative to the project root.
pub const STATE_DIR: &str = ".knurl";

/// Source root directory name relative to the project root.
pub const SOURCE_DIR: &str = "src";

/// Task log directory name within the state directory.
const TASKS_DIR: &str = "tasks";

/// Profile overlay file name within the state directory.
const AGENTS_CONFIG_FILE: &str = "agents.yaml";

/// Resolve the project root from the current working directory.
///
/// See [`root_path_from`] for the discovery rules.
pub fn root_path() -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| {
        KnurlError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    root_path_from(&cwd)
}

/// Resolve the project root from a specific directory.
///
/// Walks up from `dir` to the nearest directory containing either a `.git`
/// entry or a `Cargo.toml` file. This is useful for testing or when the
/// working directory is known.
pub fn root_path_from<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let start = dir.as_ref();

    let mut current = Some(start);
    while let Some(candidate) = current {
        if candidate.join(".git").exists() || candidate.join("Cargo.toml").is_file() {
            return Ok(candidate.to_path_buf());
        }
        current = candidate.parent();
    }

    Err(KnurlError::UserError(format!(
        "no project root found above '{}'.\n\
         Fix: run knurl from inside a project (a directory tree containing .git or Cargo.toml).",
        start.display()
    )))
}

/// Get the project source root (`{root}/src`).
pub fn source_root_path(root: &Path) -> PathBuf {
    root.join(SOURCE_DIR)
}

/// Get the default source root expressed relative to the project root.
///
/// Tasks record this relative form so that serialized tasks stay valid when
/// the project directory moves.
pub fn default_source_root(root: &Path) -> PathBuf {
    source_root_path(root)
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| source_root_path(root))
}

/// Get the root directory for per-session task logs.
pub fn task_log_root(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(TASKS_DIR)
}

/// Get the path to the optional profile overlay file.
pub fn agents_config_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(AGENTS_CONFIG_FILE)
}
