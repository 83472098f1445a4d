//! Builders shared by the task unit tests.

use crate::production::domain::{HolderKind, HolderRef};
use crate::task::domain::{Task, TaskDomainError, TaskGraph, TaskId, TaskState};
use mockable::DefaultClock;
use std::collections::HashMap;

/// Rows of `(name, state, prerequisite names)` turned into a graph.
#[derive(Default)]
pub(super) struct GraphSpec {
    rows: Vec<(String, TaskState, Vec<String>)>,
}

impl GraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task; prerequisites must have been added before it.
    pub fn task(mut self, name: &str, state: TaskState, dependencies: &[&str]) -> Self {
        self.rows.push((
            name.to_owned(),
            state,
            dependencies.iter().map(|dep| (*dep).to_owned()).collect(),
        ));
        self
    }

    pub fn build(self) -> eyre::Result<NamedGraph> {
        let holder = HolderRef::new(HolderKind::Asset);
        let mut ids: HashMap<String, TaskId> = HashMap::new();
        let mut tasks = Vec::with_capacity(self.rows.len());
        for (name, state, dependencies) in self.rows {
            let resolved = dependencies
                .iter()
                .map(|dependency| {
                    ids.get(dependency)
                        .copied()
                        .ok_or_else(|| eyre::eyre!("unknown prerequisite {dependency}"))
                })
                .collect::<eyre::Result<Vec<TaskId>>>()?;
            let created = Task::new(holder, name.as_str(), &DefaultClock)?
                .with_dependencies(resolved)
                .with_state(state);
            ids.insert(name, created.id());
            tasks.push(created);
        }
        Ok(NamedGraph {
            graph: TaskGraph::new(tasks)?,
            ids,
        })
    }
}

/// A graph plus a name -> id lookup for readable assertions.
pub(super) struct NamedGraph {
    pub graph: TaskGraph,
    pub ids: HashMap<String, TaskId>,
}

impl NamedGraph {
    /// Returns the id of a named task.
    pub fn id(&self, name: &str) -> eyre::Result<TaskId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name}"))
    }

    /// Returns the current state of a named task.
    pub fn state(&self, name: &str) -> eyre::Result<TaskState> {
        let id = self.id(name)?;
        self.graph
            .get(id)
            .map(Task::state)
            .ok_or_else(|| eyre::eyre!("task {name} missing from graph"))
    }
}

/// Creates a top-level task in a fresh asset.
pub(super) fn task(name: &str) -> Result<Task, TaskDomainError> {
    Task::new(HolderRef::new(HolderKind::Asset), name, &DefaultClock)
}
