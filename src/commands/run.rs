//! The `run` command: execute instructions on an agent as a logged task.

use crate::agent::AgentInstance;
use crate::cli::RunArgs;
use crate::config::{ConfigName, ConfigOverrides};
use crate::error::{KnurlError, Result};
use crate::task::{Task, TaskParams};
use chrono::Utc;
use serde_json::json;
use tracing::info;

pub fn cmd_run(args: RunArgs) -> Result<()> {
    let config_name = match &args.config {
        Some(name) => name.parse::<ConfigName>()?,
        None => ConfigName::default(),
    };

    let instance = AgentInstance {
        config_name,
        description: args.description,
        overrides: ConfigOverrides {
            command: args.command,
            model: args.model,
            timeout_seconds: args.timeout_seconds,
            environment: None,
        },
    };

    let mut task = Task::new(TaskParams {
        instructions: args.instructions,
        session_id: args.session_id,
        record_conversation: Some(!args.no_record),
        log_root: args.log_root,
        verbose: args.verbose,
        ..Default::default()
    })?;

    task.initialize_logging()?;

    let result = task.log_scope(|| {
        info!(session_id = %task.session_id, "task execution started");
        let result = instance.run(&task.instructions);
        match &result {
            Ok(_) => info!(session_id = %task.session_id, "task execution finished"),
            Err(e) => info!(session_id = %task.session_id, "task execution failed: {}", e),
        }
        result
    })??;

    if task.record_conversation {
        record_conversation(&task, &result)?;
    }

    println!("session: {}", task.session_id);
    println!("{}", result);
    Ok(())
}

/// Persist the instruction/result exchange next to the task's log file.
fn record_conversation(task: &Task, result: &str) -> Result<()> {
    let path = task.log_dir().join("conversation.json");
    let record = json!({
        "session_id": task.session_id,
        "recorded_at": Utc::now(),
        "instructions": task.instructions,
        "result": result,
    });

    let content = serde_json::to_string_pretty(&record).map_err(|e| {
        KnurlError::UserError(format!("failed to serialize conversation record: {}", e))
    })?;
    std::fs::write(&path, content).map_err(|e| {
        KnurlError::UserError(format!(
            "failed to write conversation record '{}': {}",
            path.display(),
            e
        ))
    })
}
