//! Task status state machine

use serde::{Deserialize, Serialize};

/// Execution status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created, not yet handed to an agent
    #[default]
    Pending,
    /// The owning agent is performing the action
    Running,
    /// Action returned a result
    Completed,
    /// Action failed
    Failed,
}

impl TaskStatus {
    /// Check if a status transition is valid
    pub fn can_transition_to(&self, target: &TaskStatus) -> bool {
        matches!(
            (self, target),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Running, TaskStatus::Failed)
        )
    }

    /// Get valid next statuses from the current one
    pub fn valid_transitions(&self) -> Vec<TaskStatus> {
        match self {
            TaskStatus::Pending => vec![TaskStatus::Running],
            TaskStatus::Running => vec![TaskStatus::Completed, TaskStatus::Failed],
            TaskStatus::Completed | TaskStatus::Failed => vec![],
        }
    }

    /// Check if the task has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
