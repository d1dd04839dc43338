//! Addressed messages exchanged between agents
//!
//! Messages travel independently of task dispatch. The registry resolves the
//! receiver and the receiving agent re-checks the address before queueing.

mod envelope;
mod kind;

pub use envelope::{Message, MessageId};
pub use kind::MessageKind;
