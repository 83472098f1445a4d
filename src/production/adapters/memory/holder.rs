//! In-memory holder repository sharing storage with the task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::production::{
    domain::{Holder, HolderKind, HolderRef, ProjectId},
    ports::{HolderRepository, ProductionRepositoryError, ProductionRepositoryResult},
};
use crate::task::{adapters::memory::InMemoryTaskRepository, domain::Task};

type HolderKey = (ProjectId, HolderKind, String);

/// Thread-safe in-memory holder repository.
///
/// Task sets passed to [`HolderRepository::create`] are written into the
/// task repository given at construction, under this repository's write
/// lock.
#[derive(Debug, Clone)]
pub struct InMemoryHolderRepository {
    state: Arc<RwLock<InMemoryHolderState>>,
    tasks: InMemoryTaskRepository,
}

#[derive(Debug, Default)]
struct InMemoryHolderState {
    holders: HashMap<HolderRef, Holder>,
    order: Vec<HolderRef>,
    name_index: HashMap<HolderKey, HolderRef>,
}

impl InMemoryHolderRepository {
    /// Creates an empty holder repository writing task sets into `tasks`.
    #[must_use]
    pub fn new(tasks: InMemoryTaskRepository) -> Self {
        Self {
            state: Arc::default(),
            tasks,
        }
    }
}

fn key_of(holder: &Holder) -> HolderKey {
    (holder.project_id(), holder.kind(), holder.name().to_owned())
}

#[async_trait]
impl HolderRepository for InMemoryHolderRepository {
    async fn create(&self, holder: &Holder, tasks: &[Task]) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let key = key_of(holder);
        if state.name_index.contains_key(&key) {
            return Err(ProductionRepositoryError::DuplicateHolderName {
                project_id: holder.project_id(),
                kind: holder.kind(),
                name: holder.name().to_owned(),
            });
        }

        self.tasks.insert_batch(tasks)?;

        state.name_index.insert(key, holder.id());
        state.order.push(holder.id());
        state.holders.insert(holder.id(), holder.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: HolderRef) -> ProductionRepositoryResult<Option<Holder>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.holders.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        project_id: ProjectId,
        kind: HolderKind,
        name: &str,
    ) -> ProductionRepositoryResult<Option<Holder>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .name_index
            .get(&(project_id, kind, name.to_owned()))
            .and_then(|id| state.holders.get(id))
            .cloned())
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        kind: HolderKind,
    ) -> ProductionRepositoryResult<Vec<Holder>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.holders.get(id))
            .filter(|holder| holder.project_id() == project_id && holder.kind() == kind)
            .cloned()
            .collect())
    }
}
