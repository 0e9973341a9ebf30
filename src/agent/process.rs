//! Transient subprocess agent.
//!
//! An [`Agent`] is scoped to a single invocation: it is constructed with
//! instructions and a resolved configuration, executed once with
//! [`Agent::run`], and torn down with [`Agent::release`]. Release is explicit
//! so callers can guarantee teardown on every exit path; `Drop` is only a
//! backstop.
//!
//! The agent process receives the instructions on stdin and reports its
//! result on stdout. Stderr is captured for error context.

use crate::config::AgentConfig;
use crate::error::{KnurlError, Result};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// A transient agent scoped to one invocation.
pub struct Agent {
    instructions: String,
    config: AgentConfig,
    /// Live process handle, kept only across failed waits so release() can
    /// still reap it.
    child: Option<Child>,
    released: bool,
}

impl Agent {
    /// Construct an agent from instructions and a resolved configuration.
    ///
    /// No side effects: the process is spawned by [`Agent::run`].
    pub fn new(instructions: impl Into<String>, config: AgentConfig) -> Self {
        Self {
            instructions: instructions.into(),
            config,
            child: None,
            released: false,
        }
    }

    /// Execute the agent synchronously to completion.
    ///
    /// Single attempt, all or nothing: spawn failures, non-zero exits, and
    /// timeouts are all errors, and no partial result is ever returned. The
    /// captured stdout is the result string.
    pub fn run(&mut self) -> Result<String> {
        if self.released {
            return Err(KnurlError::Agent(
                "agent has already been released".to_string(),
            ));
        }

        let vars = BTreeMap::from([("model", self.config.model.as_str())]);
        let command_str = render_command(&self.config.command, &vars)?;

        let argv = shell_words::split(&command_str).map_err(|e| {
            KnurlError::Config(format!(
                "failed to parse agent command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command_str, e
            ))
        })?;
        let Some((program, args)) = argv.split_first() else {
            return Err(KnurlError::Config(format!(
                "agent command is empty after parsing: '{}'",
                command_str
            )));
        };

        debug!(command = %command_str, "spawning agent process");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.config.environment {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|e| {
            KnurlError::Agent(format!(
                "failed to spawn agent command '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                program, e
            ))
        })?;

        // Feed instructions on stdin. An agent that never reads stdin closes
        // the pipe early; that is not an execution failure.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(self.instructions.as_bytes()) {
                debug!("agent closed stdin before instructions were fully written: {}", e);
            }
        }

        // Drain stdout/stderr on reader threads so the pipes never fill up
        // while we wait for the exit status.
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let waited = wait_with_timeout(&mut child, timeout);

        let stdout = collect_pipe(stdout_reader);
        let stderr = collect_pipe(stderr_reader);

        let (exit_code, timed_out) = match waited {
            Ok(outcome) => outcome,
            Err(e) => {
                // The process may still be live; keep the handle so
                // release() reaps it.
                self.child = Some(child);
                return Err(e);
            }
        };

        if timed_out {
            return Err(KnurlError::Agent(format!(
                "agent timed out after {} seconds",
                self.config.timeout_seconds
            )));
        }

        if exit_code != Some(0) {
            let status = exit_code.map_or_else(|| "no exit code".to_string(), |c| format!("code {}", c));
            return Err(KnurlError::Agent(format!(
                "agent exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        debug!(bytes = stdout.len(), "agent process completed");
        Ok(stdout)
    }

    /// Release the agent's resources.
    ///
    /// Kills and reaps any live process. Idempotent; a released agent
    /// refuses further [`Agent::run`] calls.
    pub fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            // On Unix this is SIGKILL; on Windows it is TerminateProcess.
            let _ = child.kill();
            let _ = child.wait();
        }
        self.released = true;
    }

    /// Check whether this agent has been released.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        self.release();
    }
}

/// Render a command template by substituting `{variable}` placeholders.
///
/// Unknown variables are a configuration error rather than a silent empty
/// substitution; literal braces are not supported in command templates.
fn render_command(template: &str, vars: &BTreeMap<&str, &str>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return Err(KnurlError::Config(format!(
                "agent command template has an unmatched '{{': {}",
                template
            )));
        };

        let name = after[..close].trim();
        match vars.get(name) {
            Some(value) => out.push_str(value),
            None => {
                return Err(KnurlError::Config(format!(
                    "agent command template references unknown variable '{}'\n\
                     Command: {}\n\
                     Available variables: {}",
                    name,
                    template,
                    vars.keys().copied().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Spawn a thread draining a pipe to a byte buffer.
fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

/// Join a pipe reader thread, tolerating missing or panicked readers.
fn collect_pipe(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out). On timeout the process is killed and
/// reaped before returning.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok((status.code(), false));
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(KnurlError::Agent(format!(
                    "failed to poll agent process status: {}",
                    e
                )));
            }
        }
    }
}
