//! The `logs` command: print the stored logs for a task session.

use crate::cli::LogsArgs;
use crate::error::{KnurlError, Result};
use crate::paths;
use crate::task;

pub fn cmd_logs(args: LogsArgs) -> Result<()> {
    let log_root = match args.log_root {
        Some(log_root) => log_root,
        None => paths::task_log_root(&paths::root_path()?),
    };

    // Same derivation a task uses: {log_root}/{session_id}/task_{session_id}.log
    let log_file = log_root
        .join(&args.session_id)
        .join(task::log_file_name(&args.session_id));

    if !log_file.exists() {
        return Err(KnurlError::LogNotFound(log_file));
    }

    let content = std::fs::read_to_string(&log_file).map_err(|e| {
        KnurlError::UserError(format!(
            "failed to read log file '{}': {}",
            log_file.display(),
            e
        ))
    })?;

    print!("{}", content);
    Ok(())
}
