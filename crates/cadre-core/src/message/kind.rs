//! Message kind definitions

use serde::{Deserialize, Serialize};

/// The purpose of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Request for information
    #[default]
    Query,
    /// Answer to an earlier message
    Response,
    /// Hand-off of work to another agent
    Delegation,
    /// Commentary on another agent's output
    Feedback,
    /// Progress or health report
    Status,
}

impl MessageKind {
    /// All message kinds
    pub fn all() -> [MessageKind; 5] {
        [
            MessageKind::Query,
            MessageKind::Response,
            MessageKind::Delegation,
            MessageKind::Feedback,
            MessageKind::Status,
        ]
    }

    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Query => "query",
            MessageKind::Response => "response",
            MessageKind::Delegation => "delegation",
            MessageKind::Feedback => "feedback",
            MessageKind::Status => "status",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "query" => Ok(MessageKind::Query),
            "response" => Ok(MessageKind::Response),
            "delegation" => Ok(MessageKind::Delegation),
            "feedback" => Ok(MessageKind::Feedback),
            "status" => Ok(MessageKind::Status),
            other => Err(format!("Unknown message kind: {}", other)),
        }
    }
}
