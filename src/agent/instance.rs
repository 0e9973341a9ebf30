//! Reusable agent invocation descriptor.
//!
//! An [`AgentInstance`] stores *how* to build and run one agent: a profile
//! name plus typed overrides. It is plain serializable data, so instances can
//! be kept in a registry file and run repeatedly without reinitialization.

use crate::agent::Agent;
use crate::config::{AgentConfigBuilder, ConfigName, ConfigOverrides};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A reusable descriptor for building and running one agent.
///
/// `run` takes `&self` and holds no mutable state: every call resolves a
/// fresh configuration and constructs a fresh agent, so concurrent calls on
/// the same instance are safe as far as this type is concerned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentInstance {
    /// Profile selecting the base configuration.
    pub config_name: ConfigName,

    /// Free-text label; no effect on execution.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Typed overrides merged into the profile at run time.
    #[serde(skip_serializing_if = "ConfigOverrides::is_empty")]
    pub overrides: ConfigOverrides,
}

impl AgentInstance {
    /// Create an instance for a profile with no overrides.
    pub fn new(config_name: ConfigName) -> Self {
        Self {
            config_name,
            ..Default::default()
        }
    }

    /// Execute the given instructions on an agent built from this instance's
    /// configuration and return the result.
    ///
    /// Resolution and merging are delegated to
    /// [`AgentConfigBuilder::create_from_args`]; the transient agent is
    /// released before this call returns, on success and on failure. Errors
    /// from resolution, construction, or execution propagate unmodified; no
    /// retry, no partial result.
    pub fn run(&self, instructions: &str) -> Result<String> {
        let config = AgentConfigBuilder::create_from_args(self.config_name, &self.overrides)?;
        debug!(profile = %self.config_name, model = %config.model, "resolved agent configuration");

        let mut agent = Agent::new(instructions, config);
        let result = agent.run();
        agent.release();

        result
    }
}
