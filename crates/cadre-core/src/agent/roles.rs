//! Built-in action handlers for each agent kind
//!
//! These are deterministic stand-ins for the external service that does the
//! real research, analysis, planning, and execution work. An action name a
//! role does not know yields a soft `unknown_action` result, not an error.

use serde_json::{json, Value};

use super::AgentKind;
use crate::buffer::BoundedBuffer;
use crate::config::AgentConfig;
use crate::error::ActionError;
use crate::Payload;

/// Variant-specific state and behavior of an agent
#[derive(Debug, Clone)]
pub enum Role {
    Researcher(Researcher),
    Analyzer(Analyzer),
    Planner(Planner),
    Executor(Executor),
}

impl Role {
    /// Fresh role state for a kind, with unbounded per-role buffers
    pub fn new(kind: AgentKind) -> Self {
        Self::with_config(kind, &AgentConfig::default())
    }

    /// Fresh role state whose buffers follow the agent's history capacity
    pub fn with_config(kind: AgentKind, config: &AgentConfig) -> Self {
        match kind {
            AgentKind::Researcher => Role::Researcher(Researcher {
                topics: BoundedBuffer::with_capacity(config.history_capacity),
            }),
            AgentKind::Analyzer => Role::Analyzer(Analyzer),
            AgentKind::Planner => Role::Planner(Planner),
            AgentKind::Executor => Role::Executor(Executor::default()),
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Role::Researcher(_) => AgentKind::Researcher,
            Role::Analyzer(_) => AgentKind::Analyzer,
            Role::Planner(_) => AgentKind::Planner,
            Role::Executor(_) => AgentKind::Executor,
        }
    }

    /// Perform an action with the built-in handler for this role
    pub fn perform(&mut self, action: &str, parameters: &Payload) -> Result<Value, ActionError> {
        match (self, action) {
            (Role::Researcher(r), "gather_data") => r.gather_data(parameters),
            (Role::Analyzer(a), "analyze_data") => a.analyze_data(parameters),
            (Role::Planner(p), "create_strategy") => p.create_strategy(parameters),
            (Role::Executor(e), "implement_plan") => e.implement_plan(parameters),
            (_, other) => Ok(unknown_action(other)),
        }
    }
}

/// Soft "not understood" result
pub fn unknown_action(action: &str) -> Value {
    json!({ "action": action, "status": "unknown_action" })
}

/// Read an optional string parameter, falling back to `default` when absent
fn string_param(parameters: &Payload, name: &str, default: &str) -> Result<String, ActionError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ActionError::InvalidParameter {
            name: name.to_string(),
            expected: "string".to_string(),
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Researcher {
    /// Topics gathered so far, oldest first; bounded like task history
    pub topics: BoundedBuffer<String>,
}

impl Researcher {
    const SOURCES_PER_TOPIC: u32 = 5;

    fn gather_data(&mut self, parameters: &Payload) -> Result<Value, ActionError> {
        let topic = string_param(parameters, "topic", "")?;
        tracing::info!("Gathering data on: {}", topic);
        self.topics.push(topic.clone());
        Ok(json!({
            "action": "gather_data",
            "topic": topic,
            "data": format!("Research data for {}", topic),
            "sources": Self::SOURCES_PER_TOPIC,
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer;

impl Analyzer {
    fn analyze_data(&self, parameters: &Payload) -> Result<Value, ActionError> {
        let depth = string_param(parameters, "depth", "basic")?;
        match parameters.get("data") {
            None | Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(ActionError::InvalidParameter {
                    name: "data".to_string(),
                    expected: "object or array".to_string(),
                })
            }
        }
        tracing::info!("Analyzing data with depth: {}", depth);
        Ok(json!({
            "action": "analyze_data",
            "insights": format!("Key insights from {} analysis", depth),
            "patterns": 3,
            "confidence_score": 0.85,
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Planner;

impl Planner {
    fn create_strategy(&self, parameters: &Payload) -> Result<Value, ActionError> {
        let timeline = string_param(parameters, "timeline", "1_month")?;
        tracing::info!("Creating strategy for: {}", timeline);
        Ok(json!({
            "action": "create_strategy",
            "timeline": timeline,
            "phases": 3,
            "milestones": 5,
            "resource_requirements": "moderate",
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Plans implemented by this agent; only ever increases
    pub execution_count: u64,
}

impl Executor {
    fn implement_plan(&mut self, parameters: &Payload) -> Result<Value, ActionError> {
        let resources = string_param(parameters, "resources", "basic")?;
        self.execution_count += 1;
        tracing::info!("Implementing plan with resources: {}", resources);
        Ok(json!({
            "action": "implement_plan",
            "resources": resources,
            "execution_count": self.execution_count,
            "completion_percentage": 100,
            "status": "completed",
        }))
    }
}
