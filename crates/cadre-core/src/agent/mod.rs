//! Agents and the registry that owns them
//!
//! An agent is a closed variant over four kinds (researcher, analyzer,
//! planner, executor). All kinds share the same inbox, knowledge store, and
//! task history; they differ only in the actions they understand.

mod agent;
mod performer;
mod registry;
mod roles;
mod types;

pub use agent::{Agent, AgentStatus};
pub use performer::{ActionPerformer, ActionRequest};
pub use registry::{AgentHandle, AgentRegistry};
pub use roles::{unknown_action, Analyzer, Executor, Planner, Researcher, Role};
pub use types::AgentKind;
