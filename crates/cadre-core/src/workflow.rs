//! Reference workflow: one canonical task per enabled agent kind
//!
//! A caller supplies a free-text task description, the agent kinds to run,
//! and model settings. The workflow creates one agent per kind, builds that
//! kind's primary task with the description in its parameters, and
//! dispatches the tasks one at a time in canonical order:
//!
//! ```text
//! Researcher → Analyzer → Planner → Executor
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::agent::{AgentKind, AgentRegistry, AgentStatus};
use crate::config::{ModelSettings, WorkflowDefaults};
use crate::error::WorkflowError;
use crate::task::{ExecutionOutcome, Task, TaskStatus};

/// What the caller wants run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// Free-text task description
    pub description: String,
    /// Agent kinds to run
    pub enabled: Vec<AgentKind>,
    /// Settings forwarded to the action performer
    pub model: ModelSettings,
}

impl WorkflowRequest {
    /// Request with every agent kind enabled and default model settings
    pub fn new(description: impl Into<String>) -> Self {
        Self::from_defaults(description, &WorkflowDefaults::default())
    }

    /// Request seeded from configured defaults
    pub fn from_defaults(description: impl Into<String>, defaults: &WorkflowDefaults) -> Self {
        Self {
            description: description.into(),
            enabled: defaults.enabled.clone(),
            model: defaults.model.clone(),
        }
    }

    /// Builder: restrict to the given kinds
    pub fn with_agents(mut self, kinds: impl IntoIterator<Item = AgentKind>) -> Self {
        self.enabled = kinds.into_iter().collect();
        self
    }

    /// Builder: replace model settings
    pub fn with_model(mut self, model: ModelSettings) -> Self {
        self.model = model;
        self
    }

    /// Check the request before anything is created
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.description.trim().is_empty() {
            return Err(WorkflowError::EmptyDescription);
        }
        if self.enabled.is_empty() {
            return Err(WorkflowError::NoAgentsEnabled);
        }
        self.model.validate()
    }

    /// Enabled kinds in canonical order, without duplicates
    pub fn ordered_kinds(&self) -> Vec<AgentKind> {
        AgentKind::all()
            .into_iter()
            .filter(|kind| self.enabled.contains(kind))
            .collect()
    }

    /// Build the primary task for `kind` on `agent_id`
    pub fn task_for(&self, kind: AgentKind, agent_id: &str) -> Task {
        let task = Task::new(agent_id, kind.primary_action())
            .with_param("task", json!(self.description))
            .with_param("model", json!(self.model));
        match kind {
            AgentKind::Researcher => task.with_param("topic", json!(self.description)),
            AgentKind::Analyzer => task
                .with_param("data", json!({ "description": self.description }))
                .with_param("depth", json!("detailed")),
            AgentKind::Planner => task.with_param("timeline", json!("3_months")),
            AgentKind::Executor => task.with_param("resources", json!("allocated")),
        }
    }
}

/// One agent's part of a workflow run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStep {
    pub agent_id: String,
    pub kind: AgentKind,
    pub task: Task,
    pub outcome: ExecutionOutcome,
}

/// Everything a workflow run produced
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub description: String,
    pub model: ModelSettings,
    pub steps: Vec<WorkflowStep>,
    pub statuses: BTreeMap<String, AgentStatus>,
}

impl WorkflowReport {
    pub fn completed(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.task.status() == TaskStatus::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.completed()
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.outcome.is_success())
    }

    /// Result of the step run by `kind`, if it succeeded
    pub fn result_for(&self, kind: AgentKind) -> Option<&Value> {
        self.steps
            .iter()
            .find(|s| s.kind == kind)
            .and_then(|s| s.outcome.result())
    }
}

/// Run the reference workflow on `registry`.
///
/// Agents are left running so the caller can inspect or reuse them.
pub async fn run_workflow(
    registry: &AgentRegistry,
    request: &WorkflowRequest,
) -> Result<WorkflowReport, WorkflowError> {
    request.validate()?;
    let kinds = request.ordered_kinds();
    tracing::info!(
        "Running workflow with {} agent(s) on model {}",
        kinds.len(),
        request.model.model
    );

    let agents: Vec<_> = kinds.iter().map(|&kind| registry.spawn(kind)).collect();

    let mut steps = Vec::with_capacity(agents.len());
    for (index, agent) in agents.iter().enumerate() {
        let mut task = request.task_for(agent.kind(), agent.id());
        let outcome = registry.dispatch(&mut task).await;
        tracing::info!(
            "[{}/{}] {} finished task {}: {}",
            index + 1,
            agents.len(),
            agent.kind().name(),
            task.id,
            task.status()
        );
        steps.push(WorkflowStep {
            agent_id: agent.id().to_string(),
            kind: agent.kind(),
            task,
            outcome,
        });
    }

    let statuses = registry.all_statuses().await;
    Ok(WorkflowReport {
        description: request.description.clone(),
        model: request.model.clone(),
        steps,
        statuses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_request() {
        assert_eq!(
            WorkflowRequest::new("  ").validate(),
            Err(WorkflowError::EmptyDescription)
        );
        assert_eq!(
            WorkflowRequest::new("x")
                .with_agents(Vec::new())
                .validate(),
            Err(WorkflowError::NoAgentsEnabled)
        );
        let mut model = ModelSettings::default();
        model.temperature = -0.1;
        assert!(matches!(
            WorkflowRequest::new("x").with_model(model).validate(),
            Err(WorkflowError::InvalidModelSettings(_))
        ));
    }

    #[test]
    fn test_ordered_kinds_dedupes() {
        let request = WorkflowRequest::new("x").with_agents([
            AgentKind::Executor,
            AgentKind::Researcher,
            AgentKind::Executor,
        ]);
        assert_eq!(
            request.ordered_kinds(),
            vec![AgentKind::Researcher, AgentKind::Executor]
        );
    }

    #[test]
    fn test_task_carries_description() {
        let request = WorkflowRequest::new("AI trends");
        let task = request.task_for(AgentKind::Researcher, "researcher_1");
        assert_eq!(task.action, "gather_data");
        assert_eq!(task.parameters["topic"], json!("AI trends"));
        assert_eq!(task.parameters["task"], json!("AI trends"));
        assert_eq!(task.parameters["model"]["model"], json!("gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn test_run_subset() {
        let registry = AgentRegistry::new();
        let request =
            WorkflowRequest::new("AI trends").with_agents([AgentKind::Planner, AgentKind::Analyzer]);

        let report = run_workflow(&registry, &request).await.unwrap();
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].kind, AgentKind::Analyzer);
        assert!(report.all_succeeded());
        assert_eq!(report.completed(), 2);
        assert_eq!(
            report.result_for(AgentKind::Planner).unwrap()["timeline"],
            json!("3_months")
        );
        assert!(report.result_for(AgentKind::Researcher).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_request_creates_nothing() {
        let registry = AgentRegistry::new();
        let err = run_workflow(&registry, &WorkflowRequest::new(""))
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::EmptyDescription);
        assert!(registry.is_empty());
    }
}
