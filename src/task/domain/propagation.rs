//! Automatic state propagation through the dependency graph.
//!
//! After a task's state is stored (by a user or at creation), the task
//! recomputes its own automatic state from its prerequisites and the change
//! cascades to every transitively dependent task:
//!
//! 1. A task without prerequisites that is `pending` becomes `can_start`.
//! 2. A rejected or held prerequisite forces `hold`; nothing else is
//!    evaluated. A reject therefore locks its whole downstream chain.
//! 3. When every prerequisite is `done`, `hold` becomes `to_continue`,
//!    `pending` becomes `can_start`, and any other state is kept.
//! 4. Otherwise the state is kept.
//!
//! The rules are idempotent, so a dependent reached through several paths
//! converges to the same state whatever order its prerequisites are visited
//! in. The graph must be acyclic; template validation guarantees this for
//! every graph built from a template.

use super::{TaskDomainError, TaskGraph, TaskId, TaskState};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A state change applied to one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// Task whose state changed.
    pub task_id: TaskId,
    /// State before the change.
    pub from: TaskState,
    /// State after the change.
    pub to: TaskState,
}

/// Computes the automatic state for a task, or `None` when it stays as is.
#[must_use]
pub fn automatic_state(current: TaskState, dependencies: &[TaskState]) -> Option<TaskState> {
    if dependencies.is_empty() && current == TaskState::Pending {
        return Some(TaskState::CanStart);
    }
    if dependencies
        .iter()
        .any(|state| matches!(state, TaskState::Reject | TaskState::Hold))
    {
        return (current != TaskState::Hold).then_some(TaskState::Hold);
    }
    if dependencies.iter().all(|state| *state == TaskState::Done) {
        return match current {
            TaskState::Hold => Some(TaskState::ToContinue),
            TaskState::Pending => Some(TaskState::CanStart),
            _ => None,
        };
    }
    None
}

/// Recomputes the automatic state of one task from its prerequisites.
///
/// Returns the applied change, or `None` when the task was already
/// converged or is not part of the graph.
pub fn recompute_self(
    graph: &mut TaskGraph,
    task_id: TaskId,
    clock: &impl Clock,
) -> Option<StateChange> {
    let dependencies: Vec<TaskState> = graph
        .dependency_states(task_id)
        .into_iter()
        .map(|(_, state)| state)
        .collect();
    let task = graph.task_mut(task_id)?;
    let next = automatic_state(task.state(), &dependencies)?;
    let from = task.overwrite_state(next, clock)?;
    info!(task = task.name(), %from, to = %next, "task state recomputed");
    Some(StateChange {
        task_id,
        from,
        to: next,
    })
}

/// Recomputes `task_id` and then every task that transitively depends on
/// it, depth first.
///
/// Returns every applied change in the order it happened. A task reached
/// through several paths is recomputed once per path.
pub fn propagate(graph: &mut TaskGraph, task_id: TaskId, clock: &impl Clock) -> Vec<StateChange> {
    let mut changes = Vec::new();
    let mut stack = vec![task_id];
    while let Some(current) = stack.pop() {
        changes.extend(recompute_self(graph, current, clock));
        stack.extend(graph.dependent_ids(current).iter().rev().copied());
    }
    changes
}

/// Recomputes every task without prerequisites.
///
/// Run after a task set is instantiated so that unblocked tasks start in
/// `can_start` whatever their initial state was.
pub fn seed(graph: &mut TaskGraph, clock: &impl Clock) -> Vec<StateChange> {
    let roots: Vec<TaskId> = graph
        .tasks()
        .filter(|task| !task.has_dependencies())
        .map(super::Task::id)
        .collect();
    roots
        .into_iter()
        .filter_map(|task_id| recompute_self(graph, task_id, clock))
        .collect()
}

/// Propagates from every task without prerequisites, which reaches the
/// whole acyclic graph.
pub fn refresh(graph: &mut TaskGraph, clock: &impl Clock) -> Vec<StateChange> {
    let roots: Vec<TaskId> = graph
        .tasks()
        .filter(|task| !task.has_dependencies())
        .map(super::Task::id)
        .collect();
    roots
        .into_iter()
        .flat_map(|task_id| propagate(graph, task_id, clock))
        .collect()
}

/// Stores `state` on a task and propagates the change to its dependents.
///
/// No transition rule is consulted; callers validate first with
/// [`TaskGraph::check_transition`]. The returned list starts with the
/// direct change (when the state differed) followed by every propagated
/// change.
///
/// # Errors
///
/// Returns [`TaskDomainError::TaskNotInGraph`] when the task is unknown.
pub fn apply_state(
    graph: &mut TaskGraph,
    task_id: TaskId,
    state: TaskState,
    clock: &impl Clock,
) -> Result<Vec<StateChange>, TaskDomainError> {
    let task = graph
        .task_mut(task_id)
        .ok_or(TaskDomainError::TaskNotInGraph(task_id))?;
    let mut changes = Vec::new();
    if let Some(from) = task.overwrite_state(state, clock) {
        info!(task = task.name(), %from, to = %state, "task state set");
        changes.push(StateChange {
            task_id,
            from,
            to: state,
        });
    }
    changes.extend(propagate(graph, task_id, clock));
    Ok(changes)
}
