//! Repository ports for projects, users, and task holders.

use crate::production::domain::{Holder, HolderKind, HolderRef, Project, ProjectId, User, UserId};
use crate::task::domain::Task;
use crate::task::ports::TaskRepositoryError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for production repository operations.
pub type ProductionRepositoryResult<T> = Result<T, ProductionRepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::DuplicateProjectName`] when a
    /// project with the same name exists.
    async fn store(&self, project: &Project) -> ProductionRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProductionRepositoryResult<Option<Project>>;

    /// Finds a project by its unique name.
    async fn find_by_name(&self, name: &str) -> ProductionRepositoryResult<Option<Project>>;

    /// Returns every project in creation order.
    async fn list_all(&self) -> ProductionRepositoryResult<Vec<Project>>;
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::DuplicateUserName`] when a user
    /// with the same name exists.
    async fn store(&self, user: &User) -> ProductionRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> ProductionRepositoryResult<Option<User>>;

    /// Finds a user by its unique name.
    async fn find_by_name(&self, name: &str) -> ProductionRepositoryResult<Option<User>>;

    /// Returns every user in creation order.
    async fn list_all(&self) -> ProductionRepositoryResult<Vec<User>>;
}

/// Asset and shot persistence contract.
#[async_trait]
pub trait HolderRepository: Send + Sync {
    /// Stores a new holder together with its initial task set.
    ///
    /// The holder and its tasks form one unit of work: when any part is
    /// rejected nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::DuplicateHolderName`] when the
    /// project already has a holder of the same kind and name, or
    /// [`ProductionRepositoryError::Tasks`] when the task batch is rejected.
    async fn create(&self, holder: &Holder, tasks: &[Task]) -> ProductionRepositoryResult<()>;

    /// Finds a holder by reference.
    async fn find_by_id(&self, id: HolderRef) -> ProductionRepositoryResult<Option<Holder>>;

    /// Finds a holder by project, kind, and name.
    async fn find_by_name(
        &self,
        project_id: ProjectId,
        kind: HolderKind,
        name: &str,
    ) -> ProductionRepositoryResult<Option<Holder>>;

    /// Returns the holders of one kind in a project, in creation order.
    async fn list_by_project(
        &self,
        project_id: ProjectId,
        kind: HolderKind,
    ) -> ProductionRepositoryResult<Vec<Holder>>;
}

/// Errors returned by production repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProductionRepositoryError {
    /// A project with the same name already exists.
    #[error("duplicate project name: {0}")]
    DuplicateProjectName(String),

    /// A user with the same name already exists.
    #[error("duplicate user name: {0}")]
    DuplicateUserName(String),

    /// The project already has a holder of this kind and name.
    #[error("project {project_id} already has a {kind} named '{name}'")]
    DuplicateHolderName {
        /// Owning project.
        project_id: ProjectId,
        /// Holder kind.
        kind: HolderKind,
        /// Repeated name.
        name: String,
    },

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced holder does not exist.
    #[error("holder not found: {0}")]
    HolderNotFound(HolderRef),

    /// The holder's task set was rejected.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProductionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
