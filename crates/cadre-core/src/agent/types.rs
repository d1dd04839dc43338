//! Agent kind definitions

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// The kind of agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Research agent - gathers data on a topic
    Researcher,
    /// Analysis agent - extracts insights and patterns from data
    Analyzer,
    /// Planning agent - turns findings into a phased strategy
    Planner,
    /// Execution agent - carries out a plan
    Executor,
}

impl AgentKind {
    /// All kinds, in canonical workflow order
    pub fn all() -> [AgentKind; 4] {
        [
            AgentKind::Researcher,
            AgentKind::Analyzer,
            AgentKind::Planner,
            AgentKind::Executor,
        ]
    }

    /// Lowercase tag, also used as the agent id prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Researcher => "researcher",
            AgentKind::Analyzer => "analyzer",
            AgentKind::Planner => "planner",
            AgentKind::Executor => "executor",
        }
    }

    /// Get a human-readable name for the agent kind
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Researcher => "Research Agent",
            AgentKind::Analyzer => "Analysis Agent",
            AgentKind::Planner => "Planning Agent",
            AgentKind::Executor => "Execution Agent",
        }
    }

    /// Get a description of the agent kind's role
    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Researcher => "Gathers data and findings on a topic",
            AgentKind::Analyzer => "Extracts insights and patterns from gathered data",
            AgentKind::Planner => "Builds a phased strategy with milestones",
            AgentKind::Executor => "Implements a plan with the allocated resources",
        }
    }

    /// Actions this kind understands
    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            AgentKind::Researcher => &["gather_data"],
            AgentKind::Analyzer => &["analyze_data"],
            AgentKind::Planner => &["create_strategy"],
            AgentKind::Executor => &["implement_plan"],
        }
    }

    /// The action the reference workflow runs for this kind
    pub fn primary_action(&self) -> &'static str {
        self.actions()[0]
    }

    /// Check if this kind understands an action
    pub fn understands(&self, action: &str) -> bool {
        self.actions().contains(&action)
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "researcher" => Ok(AgentKind::Researcher),
            "analyzer" => Ok(AgentKind::Analyzer),
            "planner" => Ok(AgentKind::Planner),
            "executor" => Ok(AgentKind::Executor),
            _ => Err(AgentError::InvalidKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        for kind in AgentKind::all() {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
        assert_eq!("Planner".parse::<AgentKind>().unwrap(), AgentKind::Planner);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "critic".parse::<AgentKind>().unwrap_err();
        assert_eq!(err, AgentError::InvalidKind("critic".to_string()));
    }

    #[test]
    fn test_vocabularies_are_disjoint() {
        assert!(AgentKind::Researcher.understands("gather_data"));
        assert!(!AgentKind::Researcher.understands("implement_plan"));
        assert_eq!(AgentKind::Executor.primary_action(), "implement_plan");
    }
}
