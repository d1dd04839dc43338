//! Error types for cadre-core

use thiserror::Error;

/// Result type alias for cadre operations
pub type Result<T> = std::result::Result<T, CadreError>;

/// Main error type for cadre operations
#[derive(Error, Debug)]
pub enum CadreError {
    /// Agent-related errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Task-related errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Workflow errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Agent-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Kind string does not name one of the known agent variants
    #[error("Unknown agent type: {0}")]
    InvalidKind(String),

    /// Agent not found
    #[error("Agent not found: {0}")]
    NotFound(String),

    /// Agent has been shut down
    #[error("Agent {0} is inactive")]
    Inactive(String),

    /// Task was handed to an agent that does not own it
    #[error("Task {task_id} belongs to agent {expected}, not {actual}")]
    Mismatch {
        task_id: String,
        expected: String,
        actual: String,
    },
}

/// Task-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Invalid status transition
    #[error("Invalid task transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Stored fields disagree with the task status
    #[error("Inconsistent {status} task: {reason}")]
    Inconsistent { status: String, reason: String },
}

/// Failure raised while performing an action
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Parameter present but of the wrong shape
    #[error("Invalid parameter '{name}': expected {expected}")]
    InvalidParameter { name: String, expected: String },

    /// The backing service reported a failure
    #[error("Action failed: {0}")]
    Failed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(String),

    /// TOML or JSON parse failure
    #[error("Parse error: {0}")]
    Parse(String),

    /// TOML or JSON serialization failure
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Unsupported config file extension
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Workflow request errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// No task description given
    #[error("Task description is empty")]
    EmptyDescription,

    /// No agent kinds enabled
    #[error("No agents enabled")]
    NoAgentsEnabled,

    /// Model settings outside accepted bounds
    #[error("Invalid model settings: {0}")]
    InvalidModelSettings(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
