//! Task record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::TaskStatus;
use crate::error::TaskError;
use crate::Payload;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work addressed to one agent.
///
/// Status only moves forward (see [`TaskStatus::can_transition_to`]) and a
/// result is held if and only if the task completed. Deserialization checks
/// the same invariants and rejects records that violate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Agent responsible for execution
    pub agent_id: String,
    /// Operation to perform, interpreted by the agent's kind
    pub action: String,
    /// Action arguments
    pub parameters: Payload,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Task {
    /// Create a pending task with no parameters
    pub fn new(agent_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            agent_id: agent_id.into(),
            action: action.into(),
            parameters: Payload::new(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            result: None,
            error: None,
        }
    }

    /// Builder: replace all parameters
    pub fn with_parameters(mut self, parameters: Payload) -> Self {
        self.parameters = parameters;
        self
    }

    /// Builder: add one parameter
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Result of a completed task
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Failure description of a failed task
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pending → Running
    pub fn start(&mut self) -> Result<(), TaskError> {
        self.transition(TaskStatus::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Running → Completed, storing the result
    pub fn complete(&mut self, result: Value) -> Result<(), TaskError> {
        self.transition(TaskStatus::Completed)?;
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Running → Failed, storing the error description
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TaskError> {
        self.transition(TaskStatus::Failed)?;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, to: TaskStatus) -> Result<(), TaskError> {
        if !self.status.can_transition_to(&to) {
            return Err(TaskError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }

    /// Flat key/value view for logging and transport
    pub fn to_map(&self) -> Payload {
        let mut map = Payload::new();
        map.insert("id".to_string(), json!(self.id.as_str()));
        map.insert("agent_id".to_string(), json!(self.agent_id));
        map.insert("action".to_string(), json!(self.action));
        map.insert(
            "parameters".to_string(),
            Value::Object(self.parameters.clone()),
        );
        map.insert("status".to_string(), json!(self.status.as_str()));
        map.insert("created_at".to_string(), json!(self.created_at.to_rfc3339()));
        map.insert(
            "result".to_string(),
            self.result.clone().unwrap_or(Value::Null),
        );
        if let Some(ref error) = self.error {
            map.insert("error".to_string(), json!(error));
        }
        map
    }
}

/// Wire form of a [`Task`], checked before it becomes one
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    agent_id: String,
    action: String,
    #[serde(default)]
    parameters: Payload,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<Value>,
    error: Option<String>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let status = record.status;
        let inconsistent = |reason: &str| TaskError::Inconsistent {
            status: status.to_string(),
            reason: reason.to_string(),
        };

        if record.result.is_some() != (status == TaskStatus::Completed) {
            return Err(inconsistent("result is held only by completed tasks"));
        }
        if record.error.is_some() != (status == TaskStatus::Failed) {
            return Err(inconsistent("error is held only by failed tasks"));
        }
        if record.started_at.is_some() != (status != TaskStatus::Pending) {
            return Err(inconsistent("started_at is set once the task leaves pending"));
        }
        if record.finished_at.is_some() != status.is_terminal() {
            return Err(inconsistent("finished_at is set only on terminal tasks"));
        }
        let started_in_order = record.started_at.map_or(true, |t| t >= record.created_at);
        let finished_in_order = match (record.started_at, record.finished_at) {
            (Some(started), Some(finished)) => finished >= started,
            _ => true,
        };
        if !started_in_order || !finished_in_order {
            return Err(inconsistent("timestamps out of order"));
        }

        Ok(Task {
            id: record.id,
            agent_id: record.agent_id,
            action: record.action,
            parameters: record.parameters,
            status,
            created_at: record.created_at,
            started_at: record.started_at,
            finished_at: record.finished_at,
            result: record.result,
            error: record.error,
        })
    }
}
