//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::production::domain::HolderRef;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
    holder_index: HashMap<HolderRef, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a batch of new tasks under a single write lock.
    ///
    /// Used by holder storage so that a holder and its task set land
    /// together.
    pub(crate) fn insert_batch(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let mut batch_ids: Vec<TaskId> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if state.tasks.contains_key(&task.id()) || batch_ids.contains(&task.id()) {
                return Err(TaskRepositoryError::DuplicateTask(task.id()));
            }
            batch_ids.push(task.id());
        }

        for task in tasks {
            state.order.push(task.id());
            state
                .holder_index
                .entry(task.holder())
                .or_default()
                .push(task.id());
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        self.insert_batch(tasks)
    }

    async fn update_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if let Some(missing) = tasks
            .iter()
            .find(|task| !state.tasks.contains_key(&task.id()))
        {
            return Err(TaskRepositoryError::NotFound(missing.id()));
        }

        for task in tasks {
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_holder(&self, holder: HolderRef) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .holder_index
            .get(&holder)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn find_matching(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }
}
