//! Repository port for task persistence and lookup.

use crate::production::domain::{HolderRef, UserId};
use crate::task::domain::{Task, TaskId, TaskState};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Optional criteria for task queries. Empty criteria match every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks assigned to this user.
    pub user: Option<UserId>,
    /// Only tasks in this state.
    pub state: Option<TaskState>,
    /// Only tasks belonging to this holder.
    pub holder: Option<HolderRef>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user: None,
            state: None,
            holder: None,
        }
    }

    /// Restricts the filter to tasks assigned to `user`.
    #[must_use]
    pub const fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Restricts the filter to tasks in `state`.
    #[must_use]
    pub const fn with_state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    /// Restricts the filter to tasks of `holder`.
    #[must_use]
    pub const fn with_holder(mut self, holder: HolderRef) -> Self {
        self.holder = Some(holder);
        self
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.user.is_none_or(|user| task.assignee() == Some(user))
            && self.state.is_none_or(|state| task.state() == state)
            && self.holder.is_none_or(|holder| task.holder() == holder)
    }
}

/// Task persistence contract.
///
/// Batch operations are units of work: implementations either apply every
/// task in the batch or none of them.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a batch of new tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when any task ID
    /// already exists; nothing is stored in that case.
    async fn store_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Persists changes to a batch of existing tasks (state, assignment,
    /// comments, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when any task does not
    /// exist; nothing is updated in that case.
    async fn update_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task of a holder, subtasks included, in creation
    /// order.
    async fn find_by_holder(&self, holder: HolderRef) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task matching `filter`.
    async fn find_matching(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
