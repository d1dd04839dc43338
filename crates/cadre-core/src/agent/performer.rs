//! Seam to the external service that performs agent actions
//!
//! Without a performer, agents run their built-in handlers. With one
//! attached, every action is forwarded to it and whatever it returns (or the
//! error it raises) becomes the task's outcome.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AgentKind;
use crate::error::ActionError;
use crate::Payload;

/// An action handed to a performer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Agent performing the action
    pub agent_id: String,
    /// Kind of that agent
    pub kind: AgentKind,
    /// Action name
    pub action: String,
    /// Action arguments
    pub parameters: Payload,
}

/// Capability that executes `(action, parameters)` and returns a structured result
#[async_trait]
pub trait ActionPerformer: Send + Sync {
    /// Perform one action
    async fn perform(&self, request: &ActionRequest) -> Result<Value, ActionError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "external"
    }
}

/// Run a performer on its own task so a panic inside it surfaces as an
/// [`ActionError`] instead of unwinding through the agent.
pub(crate) async fn perform_isolated(
    performer: Arc<dyn ActionPerformer>,
    request: ActionRequest,
) -> Result<Value, ActionError> {
    let handle = tokio::spawn(async move { performer.perform(&request).await });
    match handle.await {
        Ok(result) => result,
        Err(join_err) => Err(ActionError::Failed(format!(
            "action performer aborted: {}",
            join_err
        ))),
    }
}
