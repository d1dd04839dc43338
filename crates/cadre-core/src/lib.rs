//! Cadre Core - in-process multi-agent orchestration
//!
//! This crate provides the core of the cadre agent system:
//!
//! - **Agent**: Typed workers (Researcher, Analyzer, Planner, Executor) with an inbox,
//!   a knowledge store, and task history
//! - **Registry**: Creates agents, routes messages by receiver id, dispatches tasks,
//!   and keeps an audit log of dispatched work
//! - **Message**: Addressed, immutable envelopes for agent-to-agent communication
//! - **Task**: Work items with a forward-only state machine (Pending→Running→Completed|Failed)
//! - **Workflow**: The reference run of one task per enabled agent kind
//! - **Config**: Capacity policy and workflow defaults
//!
//! # Failure containment
//!
//! Nothing below the agent boundary escapes as an error. Dispatch and
//! execution always return an [`ExecutionOutcome`]; only caller mistakes such
//! as an unknown agent kind surface as [`CadreError`].
//!
//! # Example
//!
//! ```no_run
//! use cadre_core::{AgentRegistry, Task};
//! use serde_json::json;
//!
//! # async fn demo() -> cadre_core::Result<()> {
//! let registry = AgentRegistry::new();
//! let researcher = registry.create("researcher")?;
//!
//! let mut task = Task::new(researcher.id(), "gather_data").with_param("topic", json!("Rust"));
//! let outcome = registry.dispatch(&mut task).await;
//! assert!(outcome.is_success());
//!
//! registry.shutdown_all().await;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod buffer;
pub mod config;
pub mod error;
pub mod message;
pub mod task;
pub mod workflow;

pub use agent::{
    ActionPerformer, ActionRequest, Agent, AgentHandle, AgentKind, AgentRegistry, AgentStatus,
};
pub use buffer::BoundedBuffer;
pub use config::{AgentConfig, CadreConfig, ModelSettings, RegistryConfig, WorkflowDefaults};
pub use error::{
    ActionError, AgentError, CadreError, ConfigError, Result, TaskError, WorkflowError,
};
pub use message::{Message, MessageId, MessageKind};
pub use task::{ExecutionOutcome, FailureKind, Task, TaskId, TaskStatus};
pub use workflow::{run_workflow, WorkflowReport, WorkflowRequest, WorkflowStep};

/// String-keyed JSON map used for message content and task parameters
pub type Payload = serde_json::Map<String, serde_json::Value>;
