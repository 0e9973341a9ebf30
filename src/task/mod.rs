//! Task model for knurl.
//!
//! A [`Task`] is a unit of work: validated instructions, a session id, and
//! per-session logging conventions. Construction is where validation
//! happens; a `Task` that exists always has non-empty instructions.
//!
//! The raw construction parameters ([`TaskParams`]) are retained verbatim on
//! the task so downstream consumers (an executor, a serializer) can inspect
//! or re-serialize exactly what was passed, including fields this layer does
//! not itself interpret.

use crate::error::{KnurlError, Result};
use crate::logging::TaskLogHandle;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

mod logging;

/// Fixed log file name template.
///
/// The literal `SESSION_ID` token is textually substituted with the task's
/// session id; existing log tooling depends on this exact format.
pub const TASK_LOG_NAME: &str = "task_SESSION_ID.log";

/// Placeholder token inside [`TASK_LOG_NAME`].
const SESSION_ID_TOKEN: &str = "SESSION_ID";

/// Compute the log file name for a session id.
pub fn log_file_name(session_id: &str) -> String {
    TASK_LOG_NAME.replace(SESSION_ID_TOKEN, session_id)
}

/// Generate a fresh session id.
///
/// This is the default generator used by [`Task::new`]: a random UUID v4,
/// which is unique for all practical purposes. Callers needing stronger
/// guarantees (or stable ids) supply their own id or generator.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Raw task construction parameters.
///
/// All fields except `instructions` are optional with documented defaults;
/// `instructions` defaults to empty and is rejected by [`Task::new`], so a
/// `TaskParams` deserialized without an `instructions` key fails construction
/// the same way an explicitly empty one does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskParams {
    /// The directive given to the agent. Must be non-empty.
    pub instructions: String,

    /// Explicit session id; generated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Whether the full agent conversation is persisted by the executor.
    /// Defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_conversation: Option<bool>,

    /// Project code root; defaults to the source directory relative to the
    /// discovered project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,

    /// Root directory for session log directories; defaults to
    /// `{project_root}/.knurl/tasks`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_root: Option<PathBuf>,

    /// Debug-level task logging when set.
    pub verbose: bool,
}

/// A unit of work to be executed by a task executor.
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique identifier scoping this task's log directory and file.
    pub session_id: String,

    /// The validated, non-empty directive.
    pub instructions: String,

    /// Whether the executor should persist the agent conversation.
    pub record_conversation: bool,

    /// The project code root. Relative to the project root unless the
    /// caller overrode it with something else.
    pub source_root: PathBuf,

    /// Construction timestamp.
    pub created: DateTime<Utc>,

    /// Root directory under which this task's log directory lives.
    log_root: PathBuf,

    /// Raw construction parameters, retained verbatim.
    params: TaskParams,

    /// Per-task logging sink, present once logging is initialized.
    log_handle: Option<TaskLogHandle>,
}

impl Task {
    /// Construct a task, generating a session id if none was supplied.
    ///
    /// Fails with [`KnurlError::TaskInstructions`] when the instructions are
    /// empty. This is the only validation performed here; every other
    /// parameter is accepted permissively with defaults.
    pub fn new(params: TaskParams) -> Result<Self> {
        Self::new_with_generator(params, generate_session_id)
    }

    /// Construct a task with an explicit session id generator.
    ///
    /// The generator is only invoked when `params.session_id` is absent.
    pub fn new_with_generator(
        params: TaskParams,
        generate: impl FnOnce() -> String,
    ) -> Result<Self> {
        if params.instructions.is_empty() {
            return Err(KnurlError::TaskInstructions);
        }

        let session_id = match params.session_id.clone() {
            Some(id) => id,
            None => generate(),
        };
        let record_conversation = params.record_conversation.unwrap_or(true);

        // Resolve the project root only when a default actually needs it, so
        // fully-specified tasks work outside any project.
        let (source_root, log_root) = match (params.source_root.clone(), params.log_root.clone()) {
            (Some(source_root), Some(log_root)) => (source_root, log_root),
            (source_root, log_root) => {
                let root = paths::root_path()?;
                (
                    source_root.unwrap_or_else(|| paths::default_source_root(&root)),
                    log_root.unwrap_or_else(|| paths::task_log_root(&root)),
                )
            }
        };

        Ok(Self {
            session_id,
            instructions: params.instructions.clone(),
            record_conversation,
            source_root,
            created: Utc::now(),
            log_root,
            params,
            log_handle: None,
        })
    }

    /// The raw construction parameters, exactly as passed.
    pub fn params(&self) -> &TaskParams {
        &self.params
    }
}
