//! Immutable comments appended to a task.

use super::{TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum comment length in characters.
const MAX_COMMENT_LENGTH: usize = 200;

/// A note attached to a task, usually entered alongside a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    task_id: TaskId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment for the given task, timestamped by `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the text is blank or
    /// [`TaskDomainError::CommentTooLong`] when it exceeds 200 characters.
    pub fn new(
        task_id: TaskId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = text.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyComment);
        }
        if trimmed.chars().count() > MAX_COMMENT_LENGTH {
            return Err(TaskDomainError::CommentTooLong(task_id));
        }
        Ok(Self {
            task_id,
            text: trimmed.to_owned(),
            created_at: clock.utc(),
        })
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the comment was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
