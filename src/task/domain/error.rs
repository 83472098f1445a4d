//! Error types for task domain validation and parsing.

use super::{TaskId, TaskState};
use std::fmt;
use thiserror::Error;

/// The transition rule that rejected a requested state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRejection {
    /// The requested state equals the current state.
    SameState,
    /// A done task can only be reopened through `reject`.
    DoneRequiresReject,
    /// At least one dependency has not reached `done`.
    DependenciesIncomplete {
        /// Dependencies that are not yet done.
        blocking: Vec<TaskId>,
    },
}

impl fmt::Display for TransitionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameState => f.write_str("new state is identical to the current state"),
            Self::DoneRequiresReject => {
                f.write_str("task is done, reject it first to work on it again")
            }
            Self::DependenciesIncomplete { blocking } => {
                write!(f, "{} dependency task(s) are not done", blocking.len())
            }
        }
    }
}

/// Errors returned while constructing or mutating domain tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the maximum length.
    #[error("task name '{0}' exceeds 50 characters")]
    TaskNameTooLong(String),

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// The comment text exceeds the maximum length.
    #[error("comment for task {0} exceeds 200 characters")]
    CommentTooLong(TaskId),

    /// A task depends on a task that is not part of the same graph.
    #[error("task {task_id} depends on unknown task {dependency}")]
    UnknownDependency {
        /// Task declaring the dependency.
        task_id: TaskId,
        /// The dependency that could not be resolved.
        dependency: TaskId,
    },

    /// The task is not part of the graph being evaluated.
    #[error("task {0} is not part of this task graph")]
    TaskNotInGraph(TaskId),

    /// The requested state transition is not permitted.
    #[error("cannot move task {task_id} from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Task whose state change was rejected.
        task_id: TaskId,
        /// Current task state.
        from: TaskState,
        /// Requested task state.
        to: TaskState,
        /// Rule that rejected the transition.
        reason: TransitionRejection,
    },
}

/// Error returned while parsing task states from strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
