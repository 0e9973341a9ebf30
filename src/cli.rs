//! CLI argument parsing for knurl.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Knurl: reusable agent invocation and task lifecycle core for agentic pipelines.
///
/// An agent instance pairs a named configuration profile with typed
/// overrides; a task pairs validated instructions with a session id and a
/// per-session log file under `.knurl/tasks/`.
#[derive(Parser, Debug)]
#[command(name = "knurl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for knurl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run instructions on an agent as a logged task.
    ///
    /// Builds an agent instance from the selected profile and overrides,
    /// constructs a task, initializes its logging, and executes the agent
    /// inside the task's log scope.
    Run(RunArgs),

    /// Print the stored logs for a task session.
    Logs(LogsArgs),

    /// List configuration profiles and their resolved settings.
    Profiles(ProfilesArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Instructions for the agent.
    pub instructions: String,

    /// Configuration profile to run with (default, test).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the profile's model.
    #[arg(long)]
    pub model: Option<String>,

    /// Override the profile's agent command template.
    #[arg(long)]
    pub command: Option<String>,

    /// Override the profile's timeout in seconds.
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Free-text description for the agent instance.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Explicit session id (generated when omitted).
    #[arg(long)]
    pub session_id: Option<String>,

    /// Enable debug-level task logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not persist the agent conversation.
    #[arg(long)]
    pub no_record: bool,

    /// Root directory for task logs (default: {project_root}/.knurl/tasks).
    #[arg(long)]
    pub log_root: Option<PathBuf>,
}

/// Arguments for the `logs` command.
#[derive(Parser, Debug)]
pub struct LogsArgs {
    /// Session id whose logs should be printed.
    pub session_id: String,

    /// Root directory for task logs (default: {project_root}/.knurl/tasks).
    #[arg(long)]
    pub log_root: Option<PathBuf>,
}

/// Arguments for the `profiles` command.
#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Profile overlay file (default: {project_root}/.knurl/agents.yaml).
    #[arg(long)]
    pub profiles: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
