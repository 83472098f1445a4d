//! Task aggregate root and related types.

use super::{Comment, TaskDomainError, TaskId, TaskState};
use crate::production::domain::{HolderRef, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum task name length in characters.
const MAX_TASK_NAME_LENGTH: usize = 50;

/// Trims a task name and checks it is non-empty and at most 50 characters.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyTaskName`] or
/// [`TaskDomainError::TaskNameTooLong`] when the name is invalid.
pub fn normalize_task_name(raw: &str) -> Result<&str, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTaskName);
    }
    if trimmed.chars().count() > MAX_TASK_NAME_LENGTH {
        return Err(TaskDomainError::TaskNameTooLong(raw.to_owned()));
    }
    Ok(trimmed)
}

/// The direct owner of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum TaskParent {
    /// Top-level task owned by an asset or shot.
    Holder(HolderRef),
    /// Subtask owned by another task.
    Task(TaskId),
}

/// Task aggregate root.
///
/// Dependencies are stored as the single source of truth for the dependency
/// edges; the reverse relation (dependents) is derived by
/// [`TaskGraph`](super::TaskGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    holder: HolderRef,
    parent_task: Option<TaskId>,
    name: String,
    state: TaskState,
    assignee: Option<UserId>,
    comments: Vec<Comment>,
    dependencies: Vec<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a startable top-level task inside `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] or
    /// [`TaskDomainError::TaskNameTooLong`] when the name is invalid.
    pub fn new(
        holder: HolderRef,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = normalize_task_name(&raw)?;

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            holder,
            parent_task: None,
            name: trimmed.to_owned(),
            state: TaskState::CanStart,
            assignee: None,
            comments: Vec::new(),
            dependencies: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Makes this task a subtask of `parent`.
    #[must_use]
    pub const fn with_parent_task(mut self, parent: TaskId) -> Self {
        self.parent_task = Some(parent);
        self
    }

    /// Sets the prerequisite tasks, dropping duplicates and self references.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        let own_id = self.id;
        let mut unique: Vec<TaskId> = Vec::new();
        for dependency in dependencies {
            if dependency != own_id && !unique.contains(&dependency) {
                unique.push(dependency);
            }
        }
        self.dependencies = unique;
        self
    }

    /// Sets the initial state.
    #[must_use]
    pub const fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the holder whose task tree contains this task.
    #[must_use]
    pub const fn holder(&self) -> HolderRef {
        self.holder
    }

    /// Returns the parent task for subtasks.
    #[must_use]
    pub const fn parent_task(&self) -> Option<TaskId> {
        self.parent_task
    }

    /// Returns the direct owner: the parent task for subtasks, otherwise
    /// the holder.
    #[must_use]
    pub const fn parent(&self) -> TaskParent {
        match self.parent_task {
            Some(task_id) => TaskParent::Task(task_id),
            None => TaskParent::Holder(self.holder),
        }
    }

    /// Returns `true` when the task has no parent task.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent_task.is_none()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the comment log in chronological order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the prerequisite tasks.
    #[must_use]
    pub fn dependencies(&self) -> &[TaskId] {
        &self.dependencies
    }

    /// Returns `true` when the task has at least one prerequisite.
    #[must_use]
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stores `state` without consulting the transition rules.
    ///
    /// Returns the previous state when it differed from `state`, or `None`
    /// when nothing changed.
    pub fn overwrite_state(&mut self, state: TaskState, clock: &impl Clock) -> Option<TaskState> {
        if self.state == state {
            return None;
        }
        let previous = self.state;
        self.state = state;
        self.touch(clock);
        Some(previous)
    }

    /// Assigns the task to `user`, or clears the assignment with `None`.
    pub fn assign_user(&mut self, user: Option<UserId>, clock: &impl Clock) {
        self.assignee = user;
        self.touch(clock);
    }

    /// Appends a comment to the task log and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the comment text is invalid.
    pub fn add_comment(
        &mut self,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Comment, TaskDomainError> {
        let comment = Comment::new(self.id, text, clock)?;
        self.comments.push(comment.clone());
        self.touch(clock);
        Ok(comment)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
