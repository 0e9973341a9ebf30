//! Command implementations for knurl.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod logs;
mod profiles;
mod run;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Logs(args) => logs::cmd_logs(args),
        Command::Profiles(args) => profiles::cmd_profiles(args),
    }
}
