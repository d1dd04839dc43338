//! Agent registry: creates agents, routes messages, dispatches tasks
//!
//! Each agent has two async locks. The turn lock is held for a whole task, so
//! one agent runs one task at a time while different agents run concurrently
//! through a shared `Arc<AgentRegistry>`. The state lock guards the agent
//! itself and is never held while an external performer works, so routing
//! and status reads do not wait on a slow action. The agent map and the task
//! log use short-lived std locks that are never held across an await.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::MutexGuard;

use super::{Agent, ActionPerformer, AgentKind, AgentStatus};
use crate::buffer::BoundedBuffer;
use crate::config::{AgentConfig, CadreConfig, RegistryConfig};
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::task::{ExecutionOutcome, FailureKind, Task};

/// Shared handle to a registered agent
#[derive(Clone)]
pub struct AgentHandle {
    id: String,
    kind: AgentKind,
    inner: Arc<tokio::sync::Mutex<Agent>>,
    turn: Arc<tokio::sync::Mutex<()>>,
}

impl AgentHandle {
    fn new(agent: Agent) -> Self {
        Self {
            id: agent.id().to_string(),
            kind: agent.kind(),
            inner: Arc::new(tokio::sync::Mutex::new(agent)),
            turn: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Exclusive access to the agent
    pub async fn lock(&self) -> MutexGuard<'_, Agent> {
        self.inner.lock().await
    }

    /// Status snapshot
    pub async fn status(&self) -> AgentStatus {
        self.inner.lock().await.status()
    }

    /// Execute a task on this agent.
    ///
    /// Waits for the agent's previous task to finish. The agent itself is
    /// only locked to start the task and to record its result.
    pub async fn execute(&self, task: &mut Task) -> ExecutionOutcome {
        let _turn = self.turn.lock().await;
        let pending = match self.inner.lock().await.begin(task) {
            Ok(pending) => pending,
            Err(rejected) => return rejected,
        };
        let performed = pending.perform().await;
        self.inner.lock().await.finish(task, performed)
    }
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Directory of agents plus the audit log of dispatched tasks
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, AgentHandle>>,
    task_log: Mutex<BoundedBuffer<Task>>,
    agent_config: AgentConfig,
    performer: Option<Arc<dyn ActionPerformer>>,
}

impl AgentRegistry {
    /// Create an empty registry with unbounded buffers
    pub fn new() -> Self {
        Self::with_config(&CadreConfig::default())
    }

    /// Create an empty registry using the capacity policy from `config`
    pub fn with_config(config: &CadreConfig) -> Self {
        tracing::info!("Agent registry initialized");
        Self::from_parts(config.agent.clone(), &config.registry)
    }

    fn from_parts(agent_config: AgentConfig, registry_config: &RegistryConfig) -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            task_log: Mutex::new(BoundedBuffer::with_capacity(
                registry_config.task_log_capacity,
            )),
            agent_config,
            performer: None,
        }
    }

    /// Builder: agents created by this registry delegate actions to `performer`
    pub fn with_performer(mut self, performer: Arc<dyn ActionPerformer>) -> Self {
        self.performer = Some(performer);
        self
    }

    /// Register an agent under its id.
    ///
    /// An existing agent with the same id is replaced.
    pub fn register(&self, agent: Agent) -> AgentHandle {
        let handle = AgentHandle::new(agent);
        let previous = self
            .agents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id.clone(), handle.clone());
        if previous.is_some() {
            tracing::warn!("Agent {} replaced an existing registration", handle.id);
        }
        tracing::info!("Agent {} registered", handle.id);
        handle
    }

    /// Create and register an agent from a kind name
    pub fn create(&self, kind: &str) -> Result<AgentHandle> {
        let kind: AgentKind = kind.parse().map_err(|e: AgentError| {
            tracing::error!("{}", e);
            e
        })?;
        Ok(self.spawn(kind))
    }

    /// Create and register an agent of a known kind
    pub fn spawn(&self, kind: AgentKind) -> AgentHandle {
        let mut agent = Agent::with_config(Agent::generate_id(kind), kind, &self.agent_config);
        if let Some(ref performer) = self.performer {
            agent = agent.with_performer(Arc::clone(performer));
        }
        self.register(agent)
    }

    /// Look up an agent
    pub fn get(&self, agent_id: &str) -> Option<AgentHandle> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_id)
            .cloned()
    }

    /// Registered agent ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Number of registered agents
    pub fn len(&self) -> usize {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handles(&self) -> Vec<AgentHandle> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Deliver a message to its receiver.
    ///
    /// Returns `false` when the receiver is unknown or did not accept the
    /// message.
    pub async fn route(&self, message: Message) -> bool {
        if !message.is_addressed() {
            tracing::warn!("Message {} has no receiver", message.id());
            return false;
        }
        let Some(receiver) = self.get(message.receiver_id()) else {
            tracing::warn!("Receiver {} not found", message.receiver_id());
            return false;
        };

        let sender = message.sender_id().to_string();
        let accepted = receiver.lock().await.receive(message);
        if accepted {
            tracing::info!("Message sent from {} to {}", sender, receiver.id());
        }
        accepted
    }

    /// Hand a task to its owning agent and record it in the task log.
    ///
    /// An unknown agent id yields a retryable failure; the task stays
    /// pending and is not logged. A task that already ran is rejected and
    /// not logged again.
    pub async fn dispatch(&self, task: &mut Task) -> ExecutionOutcome {
        let Some(agent) = self.get(&task.agent_id) else {
            let err = AgentError::NotFound(task.agent_id.clone());
            tracing::error!("{}", err);
            return ExecutionOutcome::failed(FailureKind::AgentNotFound, err.to_string());
        };

        let outcome = agent.execute(task).await;
        if outcome.failure_kind() == Some(FailureKind::NotPending) {
            tracing::debug!("Task {} was not pending, not logged again", task.id);
            return outcome;
        }

        let evicted = self
            .task_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.clone());
        if let Some(evicted) = evicted {
            tracing::debug!("Task log full, evicted task {}", evicted.id);
        }
        tracing::info!("Task {} dispatched to {}: {}", task.id, agent.id(), task.status());
        outcome
    }

    /// Snapshot of the dispatched tasks, oldest first
    pub fn task_log(&self) -> Vec<Task> {
        self.task_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    /// Status of one agent
    pub async fn status_of(&self, agent_id: &str) -> Option<AgentStatus> {
        let handle = self.get(agent_id)?;
        Some(handle.status().await)
    }

    /// Status of every agent, keyed by id
    pub async fn all_statuses(&self) -> BTreeMap<String, AgentStatus> {
        let mut statuses = BTreeMap::new();
        for handle in self.handles() {
            statuses.insert(handle.id.clone(), handle.status().await);
        }
        statuses
    }

    /// Shut every agent down; they stay registered
    pub async fn shutdown_all(&self) {
        for handle in self.handles() {
            handle.lock().await.shutdown();
        }
        tracing::info!("All agents shutdown");
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.ids())
            .field("agent_config", &self.agent_config)
            .field("performer", &self.performer.as_ref().map(|p| p.name()))
            .finish()
    }
}
