//! Message envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::MessageKind;
use crate::Payload;

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new random message ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An addressed envelope sent from one agent to another.
///
/// Identity, sender, kind, and creation time are fixed at construction and
/// only exposed through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    kind: MessageKind,
    sender_id: String,
    receiver_id: String,
    content: Payload,
    created_at: DateTime<Utc>,
    priority: i32,
}

impl Message {
    /// Default priority for new messages
    pub const DEFAULT_PRIORITY: i32 = 1;

    /// Create a new message with empty content
    pub fn new(
        kind: MessageKind,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            kind,
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            content: Payload::new(),
            created_at: Utc::now(),
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    /// Builder: set the payload
    pub fn with_content(mut self, content: Payload) -> Self {
        self.content = content;
        self
    }

    /// Builder: add a single payload entry
    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.content.insert(key.into(), value);
        self
    }

    /// Builder: set the priority (informational only)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Build a response addressed back to this message's sender
    pub fn reply(&self, from: impl Into<String>, content: Payload) -> Self {
        Message::new(MessageKind::Response, from, self.sender_id.clone()).with_content(content)
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    pub fn content(&self) -> &Payload {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the message carries a receiver at all
    pub fn is_addressed(&self) -> bool {
        !self.receiver_id.trim().is_empty()
    }

    /// Flat key/value view for logging and transport
    pub fn to_map(&self) -> Payload {
        let mut map = Payload::new();
        map.insert("id".to_string(), json!(self.id.as_str()));
        map.insert("kind".to_string(), json!(self.kind.as_str()));
        map.insert("sender_id".to_string(), json!(self.sender_id));
        map.insert("receiver_id".to_string(), json!(self.receiver_id));
        map.insert("content".to_string(), Value::Object(self.content.clone()));
        map.insert("created_at".to_string(), json!(self.created_at.to_rfc3339()));
        map.insert("priority".to_string(), json!(self.priority));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_defaults() {
        let msg = Message::new(MessageKind::Query, "researcher_1", "analyzer_1");
        assert_eq!(msg.kind(), MessageKind::Query);
        assert_eq!(msg.sender_id(), "researcher_1");
        assert_eq!(msg.receiver_id(), "analyzer_1");
        assert_eq!(msg.priority(), 1);
        assert!(msg.content().is_empty());
        assert!(msg.is_addressed());
    }

    #[test]
    fn test_unaddressed() {
        let msg = Message::new(MessageKind::Status, "planner_1", "");
        assert!(!msg.is_addressed());
    }

    #[test]
    fn test_reply_swaps_direction() {
        let msg = Message::new(MessageKind::Query, "a", "b").with_entry("q", json!("why"));
        let mut content = Payload::new();
        content.insert("status".to_string(), json!("processed"));
        let reply = msg.reply("b", content);

        assert_eq!(reply.kind(), MessageKind::Response);
        assert_eq!(reply.sender_id(), "b");
        assert_eq!(reply.receiver_id(), "a");
        assert_ne!(reply.id(), msg.id());
    }

    #[test]
    fn test_to_map_renders_tags() {
        let msg = Message::new(MessageKind::Delegation, "a", "b")
            .with_entry("topic", json!("rust"))
            .with_priority(3);
        let map = msg.to_map();

        assert_eq!(map["kind"], json!("delegation"));
        assert_eq!(map["priority"], json!(3));
        assert_eq!(map["content"]["topic"], json!("rust"));
        assert_eq!(map["id"], json!(msg.id().as_str()));
        assert!(map["created_at"].is_string());
    }

    #[test]
    fn test_serde_matches_map_kind() {
        let msg = Message::new(MessageKind::Feedback, "a", "b");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["kind"], json!("feedback"));
        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back.id(), msg.id());
    }
}
