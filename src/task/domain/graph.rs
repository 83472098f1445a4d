//! Dependency graph over the tasks of one holder.

use super::{Task, TaskDomainError, TaskId, TaskState, check_transition};
use std::collections::HashMap;

/// In-memory view of a task tree with forward and backward dependency
/// indexes.
///
/// Each task's own dependency list is the source of truth for the edges
/// (prerequisite -> dependent). The dependent and child indexes are derived
/// once at construction and never edited independently; only task states
/// change through the graph.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
    dependents: HashMap<TaskId, Vec<TaskId>>,
    children: HashMap<TaskId, Vec<TaskId>>,
}

impl TaskGraph {
    /// Builds a graph from a task set, keeping the given order for
    /// iteration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnknownDependency`] when a task depends on
    /// a task that is not part of the set.
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Result<Self, TaskDomainError> {
        let mut graph = Self::default();
        for task in tasks {
            let task_id = task.id();
            if graph.tasks.insert(task_id, task).is_none() {
                graph.order.push(task_id);
            }
        }

        for task_id in &graph.order {
            let Some(task) = graph.tasks.get(task_id) else {
                continue;
            };
            for dependency in task.dependencies() {
                if !graph.tasks.contains_key(dependency) {
                    return Err(TaskDomainError::UnknownDependency {
                        task_id: *task_id,
                        dependency: *dependency,
                    });
                }
                graph
                    .dependents
                    .entry(*dependency)
                    .or_default()
                    .push(*task_id);
            }
            if let Some(parent) = task.parent_task() {
                graph.children.entry(parent).or_default().push(*task_id);
            }
        }

        Ok(graph)
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the graph holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` when the task is part of the graph.
    #[must_use]
    pub fn contains(&self, task_id: TaskId) -> bool {
        self.tasks.contains_key(&task_id)
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.get(&task_id)
    }

    /// Iterates over all tasks in construction order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Consumes the graph and returns its tasks in construction order.
    #[must_use]
    pub fn into_tasks(mut self) -> Vec<Task> {
        self.order
            .iter()
            .filter_map(|id| self.tasks.remove(id))
            .collect()
    }

    /// Finds a top-level task by name.
    #[must_use]
    pub fn find_top_level(&self, name: &str) -> Option<&Task> {
        self.tasks()
            .find(|task| task.is_top_level() && task.name() == name)
    }

    /// Returns the prerequisites of a task.
    #[must_use]
    pub fn dependencies_of(&self, task_id: TaskId) -> Vec<&Task> {
        self.tasks
            .get(&task_id)
            .map(|task| {
                task.dependencies()
                    .iter()
                    .filter_map(|id| self.tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the identifiers of tasks listing `task_id` as a dependency.
    #[must_use]
    pub fn dependent_ids(&self, task_id: TaskId) -> &[TaskId] {
        self.dependents
            .get(&task_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the tasks listing `task_id` as a dependency.
    #[must_use]
    pub fn dependents_of(&self, task_id: TaskId) -> Vec<&Task> {
        self.dependent_ids(task_id)
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }

    /// Returns the direct subtasks of a task.
    #[must_use]
    pub fn children_of(&self, task_id: TaskId) -> Vec<&Task> {
        self.children
            .get(&task_id)
            .map(|ids| ids.iter().filter_map(|id| self.tasks.get(id)).collect())
            .unwrap_or_default()
    }

    /// Returns the parent-task chain of a task, nearest first.
    #[must_use]
    pub fn ancestors_of(&self, task_id: TaskId) -> Vec<&Task> {
        let mut ancestors = Vec::new();
        let mut cursor = self.tasks.get(&task_id).and_then(Task::parent_task);
        while let Some(parent_id) = cursor {
            let Some(parent) = self.tasks.get(&parent_id) else {
                break;
            };
            if ancestors.len() >= self.order.len() {
                break;
            }
            ancestors.push(parent);
            cursor = parent.parent_task();
        }
        ancestors
    }

    /// Returns the states of a task's prerequisites.
    #[must_use]
    pub fn dependency_states(&self, task_id: TaskId) -> Vec<(TaskId, TaskState)> {
        self.dependencies_of(task_id)
            .into_iter()
            .map(|task| (task.id(), task.state()))
            .collect()
    }

    /// Checks whether a task may be moved manually to `new_state`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] naming the rule that
    /// refused the change, or [`TaskDomainError::TaskNotInGraph`] when the
    /// task is unknown.
    pub fn check_transition(
        &self,
        task_id: TaskId,
        new_state: TaskState,
    ) -> Result<(), TaskDomainError> {
        let task = self
            .tasks
            .get(&task_id)
            .ok_or(TaskDomainError::TaskNotInGraph(task_id))?;
        check_transition(task.state(), new_state, self.dependency_states(task_id)).map_err(
            |reason| TaskDomainError::InvalidTransition {
                task_id,
                from: task.state(),
                to: new_state,
                reason,
            },
        )
    }

    /// Returns a mutable task for state changes.
    pub(super) fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&task_id)
    }
}
