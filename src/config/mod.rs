//! Agent configuration profiles for knurl.
//!
//! A [`ConfigName`] selects a named profile; [`AgentConfigBuilder`] resolves
//! the profile plus a set of [`ConfigOverrides`] into a runnable
//! [`AgentConfig`]. The builder is the single source of truth for merging:
//! callers never combine profile values with overrides themselves.
//!
//! Overrides are a typed, enumerated structure rather than a free-form
//! key/value bag. Unknown keys are unrepresentable in code and rejected at
//! deserialization; malformed values are rejected by [`AgentConfig::validate`].
//!
//! Built-in profiles can be overlaid from an optional `agents.yaml`-style
//! file:
//!
//! ```yaml
//! profiles:
//!   default:
//!     model: "opus"
//!     timeout_seconds: 1200
//! ```

use crate::error::{KnurlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default timeout for agent execution in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// Names of the built-in configuration profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigName {
    /// The system-wide default profile.
    #[default]
    Default,
    /// An inert profile whose agent echoes its instructions back.
    ///
    /// Used by the test suite and for pipeline smoke checks; it never
    /// reaches the network.
    Test,
}

impl ConfigName {
    /// Canonical identifier for this profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigName::Default => "default",
            ConfigName::Test => "test",
        }
    }

    /// All known profile names, in display order.
    pub fn all() -> [ConfigName; 2] {
        [ConfigName::Default, ConfigName::Test]
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigName {
    type Err = KnurlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(ConfigName::Default),
            "test" => Ok(ConfigName::Test),
            other => Err(KnurlError::Config(format!(
                "unknown configuration profile '{}'.\n\
                 Available profiles: default, test",
                other
            ))),
        }
    }
}

/// A resolved, runnable agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// The profile this configuration was resolved from.
    pub config_name: ConfigName,

    /// Command template for the agent process.
    ///
    /// Supports the `{model}` placeholder; instructions are fed to the
    /// process on stdin, not via the command line.
    pub command: String,

    /// Model identifier substituted into the command template.
    pub model: String,

    /// Maximum execution time before the agent process is killed.
    pub timeout_seconds: u64,

    /// Environment variables set for the agent process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl AgentConfig {
    /// Apply an override set on top of this configuration.
    ///
    /// `None` fields keep the profile value; `environment` entries are
    /// merged into (not replacing) the profile environment.
    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref command) = overrides.command {
            self.command = command.clone();
        }
        if let Some(ref model) = overrides.model {
            self.model = model.clone();
        }
        if let Some(timeout_seconds) = overrides.timeout_seconds {
            self.timeout_seconds = timeout_seconds;
        }
        if let Some(ref environment) = overrides.environment {
            self.environment
                .extend(environment.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    /// Validate the resolved configuration.
    ///
    /// Validation rules:
    /// - Command template must not be empty
    /// - Model must not be empty
    /// - Timeout must be positive
    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() {
            return Err(KnurlError::Config(format!(
                "profile '{}' resolved to an empty command",
                self.config_name
            )));
        }

        if self.model.is_empty() {
            return Err(KnurlError::Config(format!(
                "profile '{}' resolved to an empty model",
                self.config_name
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(KnurlError::Config(format!(
                "profile '{}' has timeout_seconds of 0; it must be greater than 0",
                self.config_name
            )));
        }

        Ok(())
    }
}

/// Typed configuration overrides.
///
/// Every field mirrors one [`AgentConfig`] field; `None` means "use the
/// profile value". Unknown keys fail deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Replace the profile command template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Replace the profile model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Replace the profile timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Merge these variables into the profile environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
}

impl ConfigOverrides {
    /// Check whether any override is set.
    pub fn is_empty(&self) -> bool {
        *self == ConfigOverrides::default()
    }
}

/// Profile overlays loaded from an `agents.yaml`-style file.
///
/// Each entry is an override set applied to the built-in profile of the same
/// name, before any per-call overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSet {
    /// Overlays keyed by profile name.
    pub profiles: BTreeMap<ConfigName, ConfigOverrides>,
}

impl ProfileSet {
    /// Load a profile set from a YAML file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` if the file exists but cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            KnurlError::Config(format!(
                "failed to read profile file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(Self::from_yaml(&content)?))
    }

    /// Parse a profile set from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| KnurlError::Config(format!("failed to parse profile file: {}", e)))
    }

    /// Get the overlay for a profile, if one is defined.
    pub fn get(&self, name: &ConfigName) -> Option<&ConfigOverrides> {
        self.profiles.get(name)
    }
}

/// Builds runnable configurations from named profiles plus overrides.
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    profiles: ProfileSet,
}

impl AgentConfigBuilder {
    /// Resolve a named built-in profile with the given overrides.
    ///
    /// Deterministic: the same name and overrides always produce the same
    /// configuration. Validation failures surface as [`KnurlError::Config`].
    pub fn create_from_args(
        config_to_load: ConfigName,
        overrides: &ConfigOverrides,
    ) -> Result<AgentConfig> {
        AgentConfigBuilder::default().create(config_to_load, overrides)
    }

    /// Create a builder that overlays file-loaded profiles on the built-ins.
    pub fn with_profiles(profiles: ProfileSet) -> Self {
        Self { profiles }
    }

    /// Resolve a named profile with the given overrides.
    ///
    /// Merge order: built-in profile, then the file overlay for that profile
    /// (if any), then the per-call overrides.
    pub fn create(&self, name: ConfigName, overrides: &ConfigOverrides) -> Result<AgentConfig> {
        let mut config = builtin_profile(name);

        if let Some(overlay) = self.profiles.get(&name) {
            config.apply(overlay);
        }
        config.apply(overrides);

        config.validate()?;
        Ok(config)
    }
}

/// The built-in profile table.
fn builtin_profile(name: ConfigName) -> AgentConfig {
    match name {
        ConfigName::Default => AgentConfig {
            config_name: name,
            command: "claude -p --model {model}".to_string(),
            model: "sonnet".to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            environment: BTreeMap::new(),
        },
        ConfigName::Test => AgentConfig {
            config_name: name,
            // `cat` echoes stdin, so the agent result is the instructions.
            command: "cat".to_string(),
            model: "test".to_string(),
            timeout_seconds: 10,
            environment: BTreeMap::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_resolves() {
        let config =
            AgentConfigBuilder::create_from_args(ConfigName::Default, &ConfigOverrides::default())
                .unwrap();

        assert_eq!(config.config_name, ConfigName::Default);
        assert_eq!(config.model, "sonnet");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.command.contains("{model}"));
    }

    #[test]
    fn test_profile_resolves_to_echo_agent() {
        let config =
            AgentConfigBuilder::create_from_args(ConfigName::Test, &ConfigOverrides::default())
                .unwrap();

        assert_eq!(config.command, "cat");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn model_override_applies_on_top_of_profile() {
        let overrides = ConfigOverrides {
            model: Some("x".to_string()),
            ..Default::default()
        };
        let config =
            AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides).unwrap();

        // Only the model changed; the rest is the profile.
        assert_eq!(config.model, "x");
        let base = AgentConfigBuilder::create_from_args(
            ConfigName::Default,
            &ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.command, base.command);
        assert_eq!(config.timeout_seconds, base.timeout_seconds);
    }

    #[test]
    fn environment_overrides_merge_into_profile() {
        let mut environment = BTreeMap::new();
        environment.insert("AGENT_FLAG".to_string(), "1".to_string());
        let overrides = ConfigOverrides {
            environment: Some(environment),
            ..Default::default()
        };

        let config = AgentConfigBuilder::create_from_args(ConfigName::Test, &overrides).unwrap();
        assert_eq!(config.environment.get("AGENT_FLAG"), Some(&"1".to_string()));
    }

    #[test]
    fn resolution_is_deterministic() {
        let overrides = ConfigOverrides {
            model: Some("x".to_string()),
            timeout_seconds: Some(42),
            ..Default::default()
        };

        let first = AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides).unwrap();
        let second = AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_command_override_fails_validation() {
        let overrides = ConfigOverrides {
            command: Some(String::new()),
            ..Default::default()
        };

        let result = AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty command"));
    }

    #[test]
    fn empty_model_override_fails_validation() {
        let overrides = ConfigOverrides {
            model: Some(String::new()),
            ..Default::default()
        };

        let result = AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty model"));
    }

    #[test]
    fn zero_timeout_override_fails_validation() {
        let overrides = ConfigOverrides {
            timeout_seconds: Some(0),
            ..Default::default()
        };

        let result = AgentConfigBuilder::create_from_args(ConfigName::Default, &overrides);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout_seconds of 0"));
    }

    #[test]
    fn config_name_display_and_parse_round_trip() {
        for name in ConfigName::all() {
            let parsed: ConfigName = name.to_string().parse().unwrap();
            assert_eq!(parsed, name);
        }
    }

    #[test]
    fn unknown_config_name_fails_to_parse() {
        let result = "planner".parse::<ConfigName>();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, KnurlError::Config(_)));
        assert!(err.to_string().contains("unknown configuration profile"));
    }

    #[test]
    fn profile_set_parses_overlays() {
        let yaml = r#"
profiles:
  default:
    model: "opus"
    timeout_seconds: 1200
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        let overlay = set.get(&ConfigName::Default).unwrap();

        assert_eq!(overlay.model.as_deref(), Some("opus"));
        assert_eq!(overlay.timeout_seconds, Some(1200));
    }

    #[test]
    fn profile_set_overlay_applies_before_call_overrides() {
        let yaml = r#"
profiles:
  default:
    model: "opus"
    timeout_seconds: 1200
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        let builder = AgentConfigBuilder::with_profiles(set);

        // Overlay alone.
        let config = builder
            .create(ConfigName::Default, &ConfigOverrides::default())
            .unwrap();
        assert_eq!(config.model, "opus");
        assert_eq!(config.timeout_seconds, 1200);

        // Call override wins over the overlay.
        let overrides = ConfigOverrides {
            model: Some("x".to_string()),
            ..Default::default()
        };
        let config = builder.create(ConfigName::Default, &overrides).unwrap();
        assert_eq!(config.model, "x");
        assert_eq!(config.timeout_seconds, 1200);
    }

    #[test]
    fn profile_set_rejects_unknown_keys() {
        let yaml = r#"
profiles:
  default:
    model: "opus"
    temperature: 0.7
"#;
        let result = ProfileSet::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse profile file"));
    }

    #[test]
    fn profile_set_load_missing_file_is_none() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = ProfileSet::load(temp_dir.path().join("agents.yaml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn overrides_serde_round_trip() {
        let overrides = ConfigOverrides {
            model: Some("x".to_string()),
            timeout_seconds: Some(300),
            ..Default::default()
        };

        let json = serde_json::to_string(&overrides).unwrap();
        let parsed: ConfigOverrides = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, overrides);
    }

    #[test]
    fn overrides_is_empty() {
        assert!(ConfigOverrides::default().is_empty());
        let overrides = ConfigOverrides {
            model: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!overrides.is_empty());
    }
}
