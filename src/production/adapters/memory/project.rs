//! In-memory project repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::production::{
    domain::{Project, ProjectId},
    ports::{ProductionRepositoryError, ProductionRepositoryResult, ProjectRepository},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: Vec<Project>,
    name_index: HashMap<String, ProjectId>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if state.name_index.contains_key(project.name()) {
            return Err(ProductionRepositoryError::DuplicateProjectName(
                project.name().to_owned(),
            ));
        }

        state
            .name_index
            .insert(project.name().to_owned(), project.id());
        state.projects.push(project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProductionRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.projects.iter().find(|project| project.id() == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> ProductionRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let Some(id) = state.name_index.get(name).copied() else {
            return Ok(None);
        };
        Ok(state.projects.iter().find(|project| project.id() == id).cloned())
    }

    async fn list_all(&self) -> ProductionRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.projects.clone())
    }
}
