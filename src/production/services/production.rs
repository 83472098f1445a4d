//! Service layer for projects, users, and template-built holders.

use crate::production::{
    domain::{
        Holder, HolderKind, HolderRef, ProductionDomainError, Project, ProjectId, User,
    },
    ports::{
        HolderRepository, ProductionRepositoryError, ProjectRepository, UserRepository,
    },
};
use crate::task::domain::Task;
use crate::template::domain::{
    DEFAULT_ASSET_TEMPLATE, DEFAULT_SHOT_TEMPLATE, TemplateCatalog, TemplateError, instantiate,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Outcome of registering a uniquely named entity.
///
/// Registering a name that is already taken is not an error: the existing
/// entity is returned instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration<T> {
    /// The entity was created.
    Created(T),
    /// An entity with the same name already existed and was left as is.
    AlreadyExists(T),
}

impl<T> Registration<T> {
    /// Returns `true` when a new entity was created.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Returns the created or existing entity.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::AlreadyExists(value) => value,
        }
    }
}

/// Request payload for creating an asset or shot from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHolderRequest {
    project_id: ProjectId,
    kind: HolderKind,
    name: String,
    template: Option<String>,
}

impl NewHolderRequest {
    /// Creates a request using the default template of `kind`.
    #[must_use]
    pub fn new(project_id: ProjectId, kind: HolderKind, name: impl Into<String>) -> Self {
        Self {
            project_id,
            kind,
            name: name.into(),
            template: None,
        }
    }

    /// Names the template to build the task tree from.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// A newly created holder and its initial task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHolder {
    /// The stored holder.
    pub holder: Holder,
    /// The stored tasks in template order, already propagated.
    pub tasks: Vec<Task>,
}

/// Service-level errors for production operations.
#[derive(Debug, Error)]
pub enum ProductionServiceError {
    /// Entity validation failed.
    #[error(transparent)]
    Domain(#[from] ProductionDomainError),
    /// The template could not be resolved or instantiated.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProductionRepositoryError),
    /// No project has the given name.
    #[error("no project named '{0}'")]
    UnknownProject(String),
    /// No user has the given name.
    #[error("no user named '{0}'")]
    UnknownUser(String),
    /// The project has no holder of this kind and name.
    #[error("no {kind} named '{name}'")]
    UnknownHolder {
        /// Holder kind searched.
        kind: HolderKind,
        /// Requested name.
        name: String,
    },
}

/// Result type for production service operations.
pub type ProductionServiceResult<T> = Result<T, ProductionServiceError>;

/// Project, user, and holder orchestration service.
pub struct ProductionService<P, U, H, C>
where
    P: ProjectRepository,
    U: UserRepository,
    H: HolderRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    users: Arc<U>,
    holders: Arc<H>,
    catalog: Arc<TemplateCatalog>,
    clock: Arc<C>,
    default_asset_template: String,
    default_shot_template: String,
}

impl<P, U, H, C> Clone for ProductionService<P, U, H, C>
where
    P: ProjectRepository,
    U: UserRepository,
    H: HolderRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            users: Arc::clone(&self.users),
            holders: Arc::clone(&self.holders),
            catalog: Arc::clone(&self.catalog),
            clock: Arc::clone(&self.clock),
            default_asset_template: self.default_asset_template.clone(),
            default_shot_template: self.default_shot_template.clone(),
        }
    }
}

impl<P, U, H, C> ProductionService<P, U, H, C>
where
    P: ProjectRepository,
    U: UserRepository,
    H: HolderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new production service over the given stores and
    /// template catalog.
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        users: Arc<U>,
        holders: Arc<H>,
        catalog: Arc<TemplateCatalog>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            users,
            holders,
            catalog,
            clock,
            default_asset_template: DEFAULT_ASSET_TEMPLATE.to_owned(),
            default_shot_template: DEFAULT_SHOT_TEMPLATE.to_owned(),
        }
    }

    /// Sets the templates used when a request names none.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownTemplate`] when either template is
    /// missing from the catalog.
    pub fn with_default_templates(
        mut self,
        asset: impl Into<String>,
        shot: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let asset_template = asset.into();
        let shot_template = shot.into();
        self.catalog.get(HolderKind::Asset, &asset_template)?;
        self.catalog.get(HolderKind::Shot, &shot_template)?;
        self.default_asset_template = asset_template;
        self.default_shot_template = shot_template;
        Ok(self)
    }

    /// Returns the template catalog.
    #[must_use]
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Creates a project, or returns the existing project of that name.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Domain`] for an invalid name or
    /// [`ProductionServiceError::Repository`] when persistence fails.
    pub async fn new_project(&self, name: &str) -> ProductionServiceResult<Registration<Project>> {
        let project = Project::new(name, &*self.clock)?;
        match self.projects.store(&project).await {
            Ok(()) => {
                info!(project = project.name(), "project created");
                Ok(Registration::Created(project))
            }
            Err(ProductionRepositoryError::DuplicateProjectName(existing)) => {
                warn!(project = %existing, "project already exists, skipping");
                let found = self
                    .projects
                    .find_by_name(&existing)
                    .await?
                    .ok_or(ProductionServiceError::UnknownProject(existing))?;
                Ok(Registration::AlreadyExists(found))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Creates a user, or returns the existing user of that name.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Domain`] for an invalid name or
    /// [`ProductionServiceError::Repository`] when persistence fails.
    pub async fn new_user(&self, name: &str) -> ProductionServiceResult<Registration<User>> {
        let user = User::new(name, &*self.clock)?;
        match self.users.store(&user).await {
            Ok(()) => {
                info!(user = user.name(), "user created");
                Ok(Registration::Created(user))
            }
            Err(ProductionRepositoryError::DuplicateUserName(existing)) => {
                warn!(user = %existing, "user already exists, skipping");
                let found = self
                    .users
                    .find_by_name(&existing)
                    .await?
                    .ok_or(ProductionServiceError::UnknownUser(existing))?;
                Ok(Registration::AlreadyExists(found))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Creates an asset or shot and its task tree from a template.
    ///
    /// The template is instantiated and propagated before anything is
    /// stored; the holder and its tasks are then committed together.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Template`] for an unknown template,
    /// [`ProductionServiceError::Domain`] for an invalid name, or
    /// [`ProductionServiceError::Repository`] when the project does not
    /// exist, the name is taken, or persistence fails. Nothing is stored on
    /// error.
    pub async fn new_holder_from_template(
        &self,
        request: NewHolderRequest,
    ) -> ProductionServiceResult<NewHolder> {
        let NewHolderRequest {
            project_id,
            kind,
            name,
            template,
        } = request;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(ProductionRepositoryError::ProjectNotFound(project_id).into());
        }

        let template_name = template.unwrap_or_else(|| self.default_template(kind).to_owned());
        let task_template = self.catalog.get(kind, &template_name)?;
        let holder = Holder::new(kind, project_id, name, template_name.as_str(), &*self.clock)?;
        let tasks = instantiate(task_template, holder.id(), &*self.clock)?.into_tasks();

        self.holders.create(&holder, &tasks).await?;
        info!(
            holder = holder.name(),
            kind = %kind,
            template = %template_name,
            tasks = tasks.len(),
            "holder created"
        );
        Ok(NewHolder { holder, tasks })
    }

    /// Finds a project by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::UnknownProject`] when no project
    /// has the name.
    pub async fn project(&self, name: &str) -> ProductionServiceResult<Project> {
        self.projects
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| ProductionServiceError::UnknownProject(name.to_owned()))
    }

    /// Returns every project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when lookup fails.
    pub async fn projects(&self) -> ProductionServiceResult<Vec<Project>> {
        Ok(self.projects.list_all().await?)
    }

    /// Finds a user by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::UnknownUser`] when no user has the
    /// name.
    pub async fn user(&self, name: &str) -> ProductionServiceResult<User> {
        self.users
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| ProductionServiceError::UnknownUser(name.to_owned()))
    }

    /// Returns every user.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when lookup fails.
    pub async fn users(&self) -> ProductionServiceResult<Vec<User>> {
        Ok(self.users.list_all().await?)
    }

    /// Returns the assets of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when lookup fails.
    pub async fn assets(&self, project_id: ProjectId) -> ProductionServiceResult<Vec<Holder>> {
        Ok(self
            .holders
            .list_by_project(project_id, HolderKind::Asset)
            .await?)
    }

    /// Returns the shots of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when lookup fails.
    pub async fn shots(&self, project_id: ProjectId) -> ProductionServiceResult<Vec<Holder>> {
        Ok(self
            .holders
            .list_by_project(project_id, HolderKind::Shot)
            .await?)
    }

    /// Finds a holder by reference.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::HolderNotFound`] (wrapped) when
    /// the holder does not exist.
    pub async fn holder(&self, id: HolderRef) -> ProductionServiceResult<Holder> {
        self.holders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductionRepositoryError::HolderNotFound(id).into())
    }

    /// Finds an asset or shot of a project by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::UnknownHolder`] when the project has
    /// no holder of that kind and name.
    pub async fn holder_by_name(
        &self,
        project_id: ProjectId,
        kind: HolderKind,
        name: &str,
    ) -> ProductionServiceResult<Holder> {
        self.holders
            .find_by_name(project_id, kind, name.trim())
            .await?
            .ok_or_else(|| ProductionServiceError::UnknownHolder {
                kind,
                name: name.to_owned(),
            })
    }

    fn default_template(&self, kind: HolderKind) -> &str {
        match kind {
            HolderKind::Asset => &self.default_asset_template,
            HolderKind::Shot => &self.default_shot_template,
        }
    }
}
