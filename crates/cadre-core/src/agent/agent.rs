//! Agent struct and status snapshot

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::performer::{perform_isolated, ActionPerformer, ActionRequest};
use super::roles::Role;
use super::AgentKind;
use crate::buffer::BoundedBuffer;
use crate::config::AgentConfig;
use crate::error::{ActionError, AgentError};
use crate::message::Message;
use crate::task::{ExecutionOutcome, FailureKind, Task};
use crate::Payload;

/// Read-only snapshot of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_id: String,
    pub agent_type: AgentKind,
    pub is_active: bool,
    pub message_queue_size: usize,
    pub task_history_count: usize,
    pub knowledge_base_size: usize,
}

/// Action started by [`Agent::begin`], awaiting its result
pub(crate) enum PendingAction {
    /// Already performed by the built-in role handler
    Done(Result<Value, ActionError>),
    /// To be handed to the external performer
    External {
        performer: Arc<dyn ActionPerformer>,
        request: ActionRequest,
    },
}

impl PendingAction {
    pub(crate) async fn perform(self) -> Result<Value, ActionError> {
        match self {
            PendingAction::Done(performed) => performed,
            PendingAction::External { performer, request } => {
                perform_isolated(performer, request).await
            }
        }
    }
}

/// A worker that receives messages and executes tasks addressed to it
pub struct Agent {
    id: String,
    role: Role,
    inbox: BoundedBuffer<Message>,
    knowledge: Payload,
    history: BoundedBuffer<Task>,
    active: bool,
    created_at: DateTime<Utc>,
    performer: Option<Arc<dyn ActionPerformer>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("inbox", &self.inbox.len())
            .field("knowledge", &self.knowledge.len())
            .field("history", &self.history.len())
            .field("active", &self.active)
            .field("performer", &self.performer.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl Agent {
    /// Create an agent with unbounded inbox and history
    pub fn new(id: impl Into<String>, kind: AgentKind) -> Self {
        Self::with_config(id, kind, &AgentConfig::default())
    }

    /// Create an agent with the capacity policy from `config`
    pub fn with_config(id: impl Into<String>, kind: AgentKind, config: &AgentConfig) -> Self {
        let id = id.into();
        tracing::info!("Agent {} initialized as {}", id, kind);
        Self {
            id,
            role: Role::with_config(kind, config),
            inbox: BoundedBuffer::with_capacity(config.inbox_capacity),
            knowledge: Payload::new(),
            history: BoundedBuffer::with_capacity(config.history_capacity),
            active: true,
            created_at: Utc::now(),
            performer: None,
        }
    }

    /// Generate a fresh id of the form `<kind>_<8 hex chars>`
    pub fn generate_id(kind: AgentKind) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}_{}", kind.as_str(), &uuid[..8])
    }

    /// Builder: delegate actions to an external performer
    pub fn with_performer(mut self, performer: Arc<dyn ActionPerformer>) -> Self {
        self.performer = Some(performer);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.role.kind()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Queued messages, oldest first
    pub fn inbox(&self) -> impl Iterator<Item = &Message> {
        self.inbox.iter()
    }

    /// Executed tasks, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Task> {
        self.history.iter()
    }

    pub fn knowledge(&self) -> &Payload {
        &self.knowledge
    }

    /// Store a value in the knowledge base, returning any previous value
    pub fn remember(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.knowledge.insert(key.into(), value)
    }

    /// Look up a knowledge entry
    pub fn recall(&self, key: &str) -> Option<&Value> {
        self.knowledge.get(key)
    }

    /// Queue a message addressed to this agent.
    ///
    /// Messages for another receiver, or arriving after shutdown, are dropped
    /// and `false` is returned.
    pub fn receive(&mut self, message: Message) -> bool {
        if message.receiver_id() != self.id {
            tracing::debug!(
                "Agent {} dropped message {} addressed to {}",
                self.id,
                message.id(),
                message.receiver_id()
            );
            return false;
        }
        if !self.active {
            tracing::warn!(
                "Agent {} is inactive, dropped message {}",
                self.id,
                message.id()
            );
            return false;
        }

        tracing::info!("Agent {} received message {}", self.id, message.id());
        if let Some(evicted) = self.inbox.push(message) {
            tracing::warn!(
                "Agent {} inbox full, evicted message {}",
                self.id,
                evicted.id()
            );
        }
        true
    }

    /// Take the oldest queued message and build the acknowledgement sent
    /// back to its sender.
    pub fn process_next(&mut self) -> Option<Message> {
        let message = self.inbox.pop()?;
        tracing::info!("Processing message {}", message.id());

        let mut content = Payload::new();
        content.insert("status".to_string(), json!("processed"));
        content.insert("in_reply_to".to_string(), json!(message.id().as_str()));
        Some(message.reply(self.id.clone(), content))
    }

    /// Execute a task owned by this agent.
    ///
    /// Never returns an error: every failure, including one raised by the
    /// action itself, is reported through the outcome. Rejections (wrong
    /// agent, inactive agent, task not pending) leave both the agent and the
    /// task untouched.
    pub async fn execute(&mut self, task: &mut Task) -> ExecutionOutcome {
        let pending = match self.begin(task) {
            Ok(pending) => pending,
            Err(rejected) => return rejected,
        };
        let performed = pending.perform().await;
        self.finish(task, performed)
    }

    /// Validate and start a task.
    ///
    /// Built-in role handlers run here; an external performer is returned
    /// unstarted so the caller can await it without holding the agent.
    pub(crate) fn begin(&mut self, task: &mut Task) -> Result<PendingAction, ExecutionOutcome> {
        if task.agent_id != self.id {
            let err = AgentError::Mismatch {
                task_id: task.id.to_string(),
                expected: task.agent_id.clone(),
                actual: self.id.clone(),
            };
            tracing::warn!("{}", err);
            return Err(ExecutionOutcome::failed(FailureKind::AgentMismatch, err.to_string()));
        }
        if !self.active {
            let err = AgentError::Inactive(self.id.clone());
            tracing::warn!("Rejected task {}: {}", task.id, err);
            return Err(ExecutionOutcome::failed(FailureKind::AgentInactive, err.to_string()));
        }
        if let Err(err) = task.start() {
            tracing::warn!("Rejected task {}: {}", task.id, err);
            return Err(ExecutionOutcome::failed(FailureKind::NotPending, err.to_string()));
        }

        tracing::info!("Agent {} executing task {}", self.id, task.id);

        Ok(match self.performer.clone() {
            Some(performer) => PendingAction::External {
                performer,
                request: ActionRequest {
                    agent_id: self.id.clone(),
                    kind: self.kind(),
                    action: task.action.clone(),
                    parameters: task.parameters.clone(),
                },
            },
            None => PendingAction::Done(self.role.perform(&task.action, &task.parameters)),
        })
    }

    /// Record the result of a started task and append it to history
    pub(crate) fn finish(
        &mut self,
        task: &mut Task,
        performed: Result<Value, ActionError>,
    ) -> ExecutionOutcome {
        let outcome = match performed {
            Ok(result) => match task.complete(result.clone()) {
                Ok(()) => ExecutionOutcome::success(result),
                Err(err) => ExecutionOutcome::failed(FailureKind::NotPending, err.to_string()),
            },
            Err(err) => {
                let description = err.to_string();
                tracing::error!("Task execution failed: {}", description);
                match task.fail(description.clone()) {
                    Ok(()) => ExecutionOutcome::failed(FailureKind::ActionFailed, description),
                    Err(err) => ExecutionOutcome::failed(FailureKind::NotPending, err.to_string()),
                }
            }
        };

        if let Some(evicted) = self.history.push(task.clone()) {
            tracing::debug!("Agent {} history full, evicted task {}", self.id, evicted.id);
        }
        outcome
    }

    /// Read-only snapshot
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            agent_id: self.id.clone(),
            agent_type: self.kind(),
            is_active: self.active,
            message_queue_size: self.inbox.len(),
            task_history_count: self.history.len(),
            knowledge_base_size: self.knowledge.len(),
        }
    }

    /// Stop accepting work. Idempotent.
    pub fn shutdown(&mut self) {
        if self.active {
            self.active = false;
            tracing::info!("Agent {} shutdown", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;
    use crate::task::TaskStatus;
    use async_trait::async_trait;

    struct Refusing;

    #[async_trait]
    impl ActionPerformer for Refusing {
        async fn perform(&self, request: &ActionRequest) -> Result<Value, ActionError> {
            Err(ActionError::Failed(format!("quota exceeded for {}", request.action)))
        }
    }

    #[test]
    fn test_generated_id_shape() {
        let id = Agent::generate_id(AgentKind::Planner);
        assert!(id.starts_with("planner_"));
        assert_eq!(id.len(), "planner_".len() + 8);
        assert_ne!(id, Agent::generate_id(AgentKind::Planner));
    }

    #[test]
    fn test_receive_only_own_messages() {
        let mut agent = Agent::new("analyzer_1", AgentKind::Analyzer);
        assert!(agent.receive(Message::new(MessageKind::Query, "x", "analyzer_1")));
        assert!(!agent.receive(Message::new(MessageKind::Query, "x", "planner_1")));
        assert_eq!(agent.status().message_queue_size, 1);
    }

    #[test]
    fn test_inbox_capacity_evicts_oldest() {
        let config = AgentConfig {
            inbox_capacity: Some(2),
            history_capacity: None,
        };
        let mut agent = Agent::with_config("a", AgentKind::Researcher, &config);
        let first = Message::new(MessageKind::Query, "x", "a");
        let first_id = first.id().clone();
        agent.receive(first);
        agent.receive(Message::new(MessageKind::Query, "x", "a"));
        agent.receive(Message::new(MessageKind::Query, "x", "a"));

        assert_eq!(agent.status().message_queue_size, 2);
        assert!(agent.inbox().all(|m| *m.id() != first_id));
    }

    #[test]
    fn test_process_next_replies_to_sender() {
        let mut agent = Agent::new("b", AgentKind::Planner);
        let msg = Message::new(MessageKind::Query, "a", "b");
        let msg_id = msg.id().clone();
        agent.receive(msg);

        let reply = agent.process_next().unwrap();
        assert_eq!(reply.kind(), MessageKind::Response);
        assert_eq!(reply.receiver_id(), "a");
        assert_eq!(reply.sender_id(), "b");
        assert_eq!(reply.content()["in_reply_to"], json!(msg_id.as_str()));
        assert!(agent.process_next().is_none());
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut agent = Agent::new("researcher_1", AgentKind::Researcher);
        let mut task = Task::new("researcher_1", "gather_data").with_param("topic", json!("X"));

        let outcome = agent.execute(&mut task).await;
        assert!(outcome.is_success());
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.result(), outcome.result());
        assert_eq!(agent.status().task_history_count, 1);
    }

    #[tokio::test]
    async fn test_execute_mismatch_leaves_state() {
        let mut agent = Agent::new("researcher_1", AgentKind::Researcher);
        agent.remember("seed", json!(1));
        let mut task = Task::new("researcher_2", "gather_data");

        let outcome = agent.execute(&mut task).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::AgentMismatch));
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(agent.status().task_history_count, 0);
        assert_eq!(agent.status().knowledge_base_size, 1);
    }

    #[tokio::test]
    async fn test_execute_failure_is_contained() {
        let mut agent = Agent::new("executor_1", AgentKind::Executor);
        let mut task = Task::new("executor_1", "implement_plan").with_param("resources", json!(7));

        let outcome = agent.execute(&mut task).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::ActionFailed));
        assert_eq!(task.status(), TaskStatus::Failed);
        assert!(task.result().is_none());
        assert!(agent.is_active());

        // Agent keeps working after a failure
        let mut next = Task::new("executor_1", "implement_plan");
        assert!(agent.execute(&mut next).await.is_success());
        assert_eq!(next.result().unwrap()["execution_count"], json!(1));
    }

    #[tokio::test]
    async fn test_unknown_action_completes() {
        let mut agent = Agent::new("planner_1", AgentKind::Planner);
        let mut task = Task::new("planner_1", "dance");

        let outcome = agent.execute(&mut task).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.result().unwrap()["status"], json!("unknown_action"));
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(agent.history().count(), 1);
    }

    #[tokio::test]
    async fn test_inactive_agent_rejects_work() {
        let mut agent = Agent::new("planner_1", AgentKind::Planner);
        agent.shutdown();
        agent.shutdown();
        assert!(!agent.status().is_active);

        let mut task = Task::new("planner_1", "create_strategy");
        let outcome = agent.execute(&mut task).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::AgentInactive));
        assert!(!outcome.is_retryable());
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(!agent.receive(Message::new(MessageKind::Status, "x", "planner_1")));
    }

    #[tokio::test]
    async fn test_task_cannot_run_twice() {
        let mut agent = Agent::new("planner_1", AgentKind::Planner);
        let mut task = Task::new("planner_1", "create_strategy");
        assert!(agent.execute(&mut task).await.is_success());

        let outcome = agent.execute(&mut task).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::NotPending));
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(agent.history().count(), 1);
    }

    #[tokio::test]
    async fn test_external_performer_failure() {
        let mut agent =
            Agent::new("analyzer_1", AgentKind::Analyzer).with_performer(Arc::new(Refusing));
        let mut task = Task::new("analyzer_1", "analyze_data");

        let outcome = agent.execute(&mut task).await;
        assert_eq!(
            outcome.error(),
            Some("Action failed: quota exceeded for analyze_data")
        );
        assert_eq!(task.error(), outcome.error());
    }
}
