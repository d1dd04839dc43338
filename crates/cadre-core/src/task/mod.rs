//! Tasks: units of work bound to a single agent
//!
//! State transitions:
//! ```text
//! Pending → Running → Completed
//!                  ↘ Failed
//! ```

mod outcome;
mod state;
mod task;

pub use outcome::{ExecutionOutcome, FailureKind};
pub use state::TaskStatus;
pub use task::{Task, TaskId};
