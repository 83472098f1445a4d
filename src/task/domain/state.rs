//! Task states and the rules for manual state changes.

use super::{ParseTaskStateError, TaskId, TransitionRejection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Production state of a task.
///
/// The variants carry no ordering; which moves are legal is decided by
/// [`check_transition`] and by the propagation rules, never by declaration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting on dependency tasks.
    Pending,
    /// All prerequisites are met and work may start.
    CanStart,
    /// Someone is working on the task.
    WorkInProgress,
    /// Work was interrupted by a rejected prerequisite and may resume.
    ToContinue,
    /// The task is finished.
    Done,
    /// The finished work was rejected.
    Reject,
    /// Locked because a prerequisite was rejected or is itself on hold.
    Hold,
    /// The task is not needed for this holder.
    Omit,
}

impl TaskState {
    /// Every state, in display order.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::CanStart,
        Self::WorkInProgress,
        Self::ToContinue,
        Self::Done,
        Self::Reject,
        Self::Hold,
        Self::Omit,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CanStart => "can_start",
            Self::WorkInProgress => "work_in_progress",
            Self::ToContinue => "to_continue",
            Self::Done => "done",
            Self::Reject => "reject",
            Self::Hold => "hold",
            Self::Omit => "omit",
        }
    }

    /// Returns the human-readable label shown to artists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending on other tasks",
            Self::CanStart => "waiting to start",
            Self::WorkInProgress => "work in progress",
            Self::ToContinue => "to be continued",
            Self::Done => "done",
            Self::Reject => "rejected",
            Self::Hold => "on hold",
            Self::Omit => "omit",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    /// Parses either the storage form (`work_in_progress`) or the label
    /// (`work in progress`), ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized || state.label() == normalized)
            .ok_or_else(|| ParseTaskStateError(value.to_owned()))
    }
}

/// Decides whether a task may be moved manually to `new_state`.
///
/// The rules are checked in order and the first one that fires is returned:
/// an identical state is refused, a done task only accepts `reject`, and no
/// state may be chosen while any dependency is not done. The dependency rule
/// applies to `reject` as well.
///
/// # Errors
///
/// Returns the [`TransitionRejection`] naming the rule that refused the
/// change.
pub fn check_transition(
    current: TaskState,
    new_state: TaskState,
    dependencies: impl IntoIterator<Item = (TaskId, TaskState)>,
) -> Result<(), TransitionRejection> {
    if new_state == current {
        return Err(TransitionRejection::SameState);
    }
    if current == TaskState::Done && new_state != TaskState::Reject {
        return Err(TransitionRejection::DoneRequiresReject);
    }
    let blocking: Vec<TaskId> = dependencies
        .into_iter()
        .filter(|(_, state)| *state != TaskState::Done)
        .map(|(id, _)| id)
        .collect();
    if !blocking.is_empty() {
        return Err(TransitionRejection::DependenciesIncomplete { blocking });
    }
    Ok(())
}
