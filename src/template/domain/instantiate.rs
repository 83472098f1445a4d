//! Building a holder's initial task tree from a template.

use super::{TaskTemplate, TemplateError};
use crate::production::domain::HolderRef;
use crate::task::domain::{Task, TaskGraph, TaskId, TaskState, propagation};
use mockable::Clock;
use std::collections::HashMap;
use tracing::debug;

/// Creates the task tree described by `template` for `holder`.
///
/// Every task starts as `can_start`; tasks with at least one prerequisite
/// start as `pending` instead. The prerequisite-free tasks are then
/// recomputed once so the graph leaves here already converged.
///
/// # Errors
///
/// Returns [`TemplateError::Task`] when a template task name is not a valid
/// task name.
pub fn instantiate(
    template: &TaskTemplate,
    holder: HolderRef,
    clock: &impl Clock,
) -> Result<TaskGraph, TemplateError> {
    let mut drafts: Vec<Task> = Vec::with_capacity(template.tasks().len());
    for spec in template.tasks() {
        drafts.push(Task::new(holder, spec.name(), clock)?);
    }
    let ids: HashMap<&str, TaskId> = template
        .tasks()
        .iter()
        .zip(&drafts)
        .map(|(spec, task)| (spec.name(), task.id()))
        .collect();

    let tasks: Vec<Task> = template
        .tasks()
        .iter()
        .zip(drafts)
        .map(|(spec, draft)| {
            let dependencies: Vec<TaskId> = spec
                .dependencies()
                .iter()
                .filter_map(|name| ids.get(name.as_str()).copied())
                .collect();
            debug!(
                task = spec.name(),
                dependencies = ?spec.dependencies(),
                "resolved template task"
            );
            let initial = if dependencies.is_empty() {
                TaskState::CanStart
            } else {
                TaskState::Pending
            };
            let mut task = draft.with_dependencies(dependencies).with_state(initial);
            if let Some(parent_id) = spec.parent().and_then(|parent| ids.get(parent)) {
                task = task.with_parent_task(*parent_id);
            }
            task
        })
        .collect();

    let mut graph = TaskGraph::new(tasks)?;
    propagation::seed(&mut graph, clock);
    Ok(graph)
}
