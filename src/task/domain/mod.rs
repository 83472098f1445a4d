//! Domain model for task states, dependency graphs, and state propagation.
//!
//! The task domain keeps the propagation engine free of infrastructure: it
//! operates on an in-memory [`TaskGraph`] loaded for one holder, and services
//! persist the resulting changes.

mod comment;
mod error;
mod graph;
mod ids;
pub mod propagation;
mod state;
mod task;

pub use comment::Comment;
pub use error::{ParseTaskStateError, TaskDomainError, TransitionRejection};
pub use graph::TaskGraph;
pub use ids::TaskId;
pub use propagation::StateChange;
pub use state::{TaskState, check_transition};
pub use task::{Task, TaskParent, normalize_task_name};
