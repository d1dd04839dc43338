//! Execution outcome returned for every dispatched task

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a task did not produce a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No agent registered under the task's agent id
    AgentNotFound,
    /// Task handed to an agent that does not own it
    AgentMismatch,
    /// Owning agent has been shut down
    AgentInactive,
    /// Task already ran (or is running) and cannot start again
    NotPending,
    /// The action itself failed
    ActionFailed,
}

impl FailureKind {
    /// Whether resubmitting the same task could succeed.
    ///
    /// Only a missing agent is retryable: it may be registered later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::AgentNotFound)
    }
}

/// Structured result of executing a task; always produced, never thrown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success {
        result: Value,
    },
    Failed {
        error: String,
        failure: FailureKind,
    },
}

impl ExecutionOutcome {
    pub fn success(result: Value) -> Self {
        ExecutionOutcome::Success { result }
    }

    pub fn failed(failure: FailureKind, error: impl Into<String>) -> Self {
        ExecutionOutcome::Failed {
            error: error.into(),
            failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            ExecutionOutcome::Success { result } => Some(result),
            ExecutionOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Success { .. } => None,
            ExecutionOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ExecutionOutcome::Success { .. } => None,
            ExecutionOutcome::Failed { failure, .. } => Some(*failure),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.failure_kind().is_some_and(|f| f.is_retryable())
    }
}
