//! Agent execution subsystem for knurl.
//!
//! This module provides the two halves of the invocation lifecycle:
//!
//! - **Process**: a transient, subprocess-backed [`Agent`] constructed from
//!   instructions plus a resolved configuration, run once, and explicitly
//!   released
//! - **Instance**: a reusable [`AgentInstance`] descriptor that can be run
//!   repeatedly, resolving a fresh configuration and agent on every call
//!
//! Agents are dispatched as subprocesses with configurable command templates.
//! This design supports any CLI-based agent tool (Claude Code, Crush,
//! opencode, custom scripts) without coupling to a specific protocol.

mod instance;
mod process;

pub use instance::AgentInstance;
pub use process::Agent;
