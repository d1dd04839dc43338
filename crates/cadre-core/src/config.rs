//! Configuration for cadre-core
//!
//! Capacity policy for agent inboxes, task history, and the registry task
//! log, plus defaults for the reference workflow. Every limit defaults to
//! unbounded.
//!
//! ```toml
//! [agent]
//! inbox_capacity = 256
//! history_capacity = 1000
//!
//! [registry]
//! task_log_capacity = 10000
//!
//! [workflow]
//! enabled = ["researcher", "analyzer", "planner", "executor"]
//!
//! [workflow.model]
//! model = "gemini-2.5-flash"
//! temperature = 0.7
//! max_tokens = 2048
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agent::AgentKind;
use crate::error::{ConfigError, WorkflowError};

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CadreConfig {
    /// Per-agent buffer limits
    pub agent: AgentConfig,
    /// Registry buffer limits
    pub registry: RegistryConfig,
    /// Reference workflow defaults
    pub workflow: WorkflowDefaults,
}

/// Per-agent buffer limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum queued inbound messages (None = unbounded)
    pub inbox_capacity: Option<usize>,
    /// Maximum retained executed tasks (None = unbounded)
    pub history_capacity: Option<usize>,
}

/// Registry buffer limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum retained entries in the dispatch log (None = unbounded)
    pub task_log_capacity: Option<usize>,
}

/// Defaults for the reference workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowDefaults {
    /// Agent kinds enabled when a request does not say otherwise
    pub enabled: Vec<AgentKind>,
    /// Model settings forwarded to the action performer
    pub model: ModelSettings,
}

impl Default for WorkflowDefaults {
    fn default() -> Self {
        Self {
            enabled: AgentKind::all().to_vec(),
            model: ModelSettings::default(),
        }
    }
}

/// Generation settings for the external action performer.
///
/// Opaque to the core apart from range checks; they travel inside task
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f64,
    /// Maximum tokens in a response
    pub max_tokens: u32,
}

impl ModelSettings {
    pub const MIN_MAX_TOKENS: u32 = 100;
    pub const MAX_MAX_TOKENS: u32 = 4096;

    /// Check ranges
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.model.trim().is_empty() {
            return Err(WorkflowError::InvalidModelSettings(
                "model must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(WorkflowError::InvalidModelSettings(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if !(Self::MIN_MAX_TOKENS..=Self::MAX_MAX_TOKENS).contains(&self.max_tokens) {
            return Err(WorkflowError::InvalidModelSettings(format!(
                "max_tokens must be between {} and {}, got {}",
                Self::MIN_MAX_TOKENS,
                Self::MAX_MAX_TOKENS,
                self.max_tokens
            )));
        }
        Ok(())
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl CadreConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            Some("json") => Self::from_json(&contents)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Default user config location: `~/.cadre/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".cadre").join("config.toml"))
    }

    /// Load the user config if one exists, otherwise defaults
    pub fn load_standard() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("agent.inbox_capacity", self.agent.inbox_capacity),
            ("agent.history_capacity", self.agent.history_capacity),
            ("registry.task_log_capacity", self.registry.task_log_capacity),
        ];
        for (name, limit) in limits {
            if limit == Some(0) {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be positive when set",
                    name
                )));
            }
        }

        self.workflow
            .model
            .validate()
            .map_err(|e| ConfigError::OutOfRange(e.to_string()))?;

        Ok(())
    }
}
