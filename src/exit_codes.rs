//! Exit code constants for the knurl CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid task construction)
//! - 2: Configuration failure (profile resolution, override validation)
//! - 3: Agent execution failure (spawn, non-zero exit, timeout)
//! - 4: Log access failure (log file not found)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing instructions, or invalid state.
pub const USER_ERROR: i32 = 1;

/// Configuration failure: profile resolution or override validation error.
pub const CONFIG_FAILURE: i32 = 2;

/// Agent execution failure: spawn error, non-zero exit, or timeout.
pub const AGENT_FAILURE: i32 = 3;

/// Log access failure: the task log file could not be found.
pub const LOG_FAILURE: i32 = 4;
