//! The `Tasker` facade: in-memory storage, the template catalog, and both
//! services wired together behind one name-based interface.

use crate::config::{ConfigError, TaskerConfig};
use crate::production::{
    adapters::memory::{InMemoryHolderRepository, InMemoryProjectRepository, InMemoryUserRepository},
    domain::{Holder, HolderKind, HolderRef, Project, User},
    services::{NewHolder, NewHolderRequest, ProductionService, ProductionServiceError, Registration},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Comment, StateChange, Task, TaskId, TaskParent, TaskState},
    ports::TaskFilter,
    services::{SetStateRequest, StateUpdate, TaskLifecycleError, TaskLifecycleService},
};
use crate::template::domain::{TaskTemplate, TemplateCatalog, TemplateError, parse_category};
use mockable::{Clock, DefaultClock};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Production service over the in-memory stores.
pub type InMemoryProductionService<C> =
    ProductionService<InMemoryProjectRepository, InMemoryUserRepository, InMemoryHolderRepository, C>;

/// Task lifecycle service over the in-memory task store.
pub type InMemoryLifecycleService<C> = TaskLifecycleService<InMemoryTaskRepository, C>;

/// Errors surfaced by the facade.
#[derive(Debug, Error)]
pub enum TaskerError {
    /// A task operation failed; refused transitions name the rule.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// A project, user, or holder operation failed.
    #[error(transparent)]
    Production(#[from] ProductionServiceError),
    /// A template could not be loaded or resolved.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The holder has no top-level task with the given name.
    #[error("{holder} has no task named '{name}'")]
    UnknownTask {
        /// Holder searched.
        holder: HolderRef,
        /// Requested task name.
        name: String,
    },
}

/// Result type for facade operations.
pub type TaskerResult<T> = Result<T, TaskerError>;

/// Task tracker facade.
///
/// Clones share storage and the mutation gate.
pub struct Tasker<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    lifecycle: InMemoryLifecycleService<C>,
    production: InMemoryProductionService<C>,
}

impl<C> Clone for Tasker<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            production: self.production.clone(),
        }
    }
}

impl Tasker<DefaultClock> {
    /// Creates a tracker with the built-in templates and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(TemplateCatalog::builtin(), Arc::new(DefaultClock))
    }

    /// Creates a tracker from configuration.
    ///
    /// The catalog at `templates_path`, if any, is merged over the built-in
    /// templates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Template`] when the template file cannot be
    /// loaded or a configured default template does not exist.
    pub fn from_config(config: &TaskerConfig) -> TaskerResult<Self> {
        let mut catalog = TemplateCatalog::builtin();
        if let Some(path) = &config.templates_path {
            catalog.merge(TemplateCatalog::load_from_path(path)?);
            info!(path = %path.display(), "loaded template catalog");
        }
        let tasker = Self::with_clock(catalog, Arc::new(DefaultClock));
        tasker.with_default_templates(
            &config.default_asset_template,
            &config.default_shot_template,
        )
    }

    /// Reads a configuration file, applies environment overrides, and
    /// creates a tracker from the result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Config`] when the file cannot be read or
    /// parsed, or the errors of [`Self::from_config`].
    pub fn from_config_file(path: &Path) -> TaskerResult<Self> {
        let config = TaskerConfig::load_from_path(path)?.with_env_overrides();
        Self::from_config(&config)
    }

    /// Parses a category name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Template`] for anything but `asset` or `shot`.
    pub fn category(name: &str) -> TaskerResult<HolderKind> {
        Ok(parse_category(name)?)
    }
}

impl Default for Tasker<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Tasker<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a tracker over empty in-memory stores.
    #[must_use]
    pub fn with_clock(catalog: TemplateCatalog, clock: Arc<C>) -> Self {
        let tasks = InMemoryTaskRepository::new();
        let holders = InMemoryHolderRepository::new(tasks.clone());
        let lifecycle = TaskLifecycleService::new(Arc::new(tasks), Arc::clone(&clock));
        let production = ProductionService::new(
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(holders),
            Arc::new(catalog),
            clock,
        );
        Self {
            lifecycle,
            production,
        }
    }

    /// Sets the templates used when a holder is created without naming one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Template`] when either template is missing.
    pub fn with_default_templates(self, asset: &str, shot: &str) -> TaskerResult<Self> {
        let Self {
            lifecycle,
            production,
        } = self;
        Ok(Self {
            lifecycle,
            production: production.with_default_templates(asset, shot)?,
        })
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub const fn lifecycle(&self) -> &InMemoryLifecycleService<C> {
        &self.lifecycle
    }

    /// Returns the production service.
    #[must_use]
    pub const fn production(&self) -> &InMemoryProductionService<C> {
        &self.production
    }

    /// Returns the templates of a category (`asset` or `shot`).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownCategory`] for any other category.
    pub fn templates_for(&self, category: &str) -> TaskerResult<Vec<&TaskTemplate>> {
        Ok(self.production.catalog().templates_for_category(category)?)
    }

    /// Creates a project; an existing name is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] for an invalid name.
    pub async fn new_project(&self, name: &str) -> TaskerResult<Registration<Project>> {
        Ok(self.production.new_project(name).await?)
    }

    /// Creates a user; an existing name is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] for an invalid name.
    pub async fn new_user(&self, name: &str) -> TaskerResult<Registration<User>> {
        Ok(self.production.new_user(name).await?)
    }

    /// Creates an asset or shot in the named project, with its task tree
    /// built from `template` or the default template of its kind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when the project is unknown, the
    /// name is invalid or taken, or the template does not exist. Nothing is
    /// stored on error.
    pub async fn new_holder_from_template(
        &self,
        project: &str,
        kind: HolderKind,
        name: &str,
        template: Option<&str>,
    ) -> TaskerResult<NewHolder> {
        let project_id = self.production.project(project).await?.id();
        let mut request = NewHolderRequest::new(project_id, kind, name);
        if let Some(template_name) = template {
            request = request.with_template(template_name);
        }
        Ok(self.production.new_holder_from_template(request).await?)
    }

    /// Finds a project by name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when no project has the name.
    pub async fn project(&self, name: &str) -> TaskerResult<Project> {
        Ok(self.production.project(name).await?)
    }

    /// Returns every project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when lookup fails.
    pub async fn projects(&self) -> TaskerResult<Vec<Project>> {
        Ok(self.production.projects().await?)
    }

    /// Finds a user by name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when no user has the name.
    pub async fn user(&self, name: &str) -> TaskerResult<User> {
        Ok(self.production.user(name).await?)
    }

    /// Returns every user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when lookup fails.
    pub async fn users(&self) -> TaskerResult<Vec<User>> {
        Ok(self.production.users().await?)
    }

    /// Returns the assets or shots of the named project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when the project is unknown.
    pub async fn holders(&self, project: &str, kind: HolderKind) -> TaskerResult<Vec<Holder>> {
        let project_id = self.production.project(project).await?.id();
        let holders = match kind {
            HolderKind::Asset => self.production.assets(project_id).await?,
            HolderKind::Shot => self.production.shots(project_id).await?,
        };
        Ok(holders)
    }

    /// Finds an asset or shot of the named project by name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when the project or holder is
    /// unknown.
    pub async fn holder(&self, project: &str, kind: HolderKind, name: &str) -> TaskerResult<Holder> {
        let project_id = self.production.project(project).await?.id();
        Ok(self
            .production
            .holder_by_name(project_id, kind, name)
            .await?)
    }

    /// Returns the tasks of a holder that have no parent task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] when lookup fails.
    pub async fn top_level_tasks(&self, holder: HolderRef) -> TaskerResult<Vec<Task>> {
        let tasks = self
            .lifecycle
            .get_tasks(TaskFilter::new().with_holder(holder))
            .await?;
        Ok(tasks.into_iter().filter(Task::is_top_level).collect())
    }

    /// Finds a top-level task of a holder by name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::UnknownTask`] when the holder has no such
    /// task.
    pub async fn holder_task(&self, holder: HolderRef, name: &str) -> TaskerResult<Task> {
        self.top_level_tasks(holder)
            .await?
            .into_iter()
            .find(|task| task.name() == name)
            .ok_or_else(|| TaskerError::UnknownTask {
                holder,
                name: name.to_owned(),
            })
    }

    /// Returns the tasks assigned to the named user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when the user is unknown.
    pub async fn tasks_of_user(&self, user: &str) -> TaskerResult<Vec<Task>> {
        let user_id = self.production.user(user).await?.id();
        Ok(self
            .lifecycle
            .get_tasks(TaskFilter::new().with_user(user_id))
            .await?)
    }

    /// Returns every task matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] when lookup fails.
    pub async fn get_tasks(&self, filter: TaskFilter) -> TaskerResult<Vec<Task>> {
        Ok(self.lifecycle.get_tasks(filter).await?)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] when the task does not exist.
    pub async fn task(&self, task_id: TaskId) -> TaskerResult<Task> {
        Ok(self.lifecycle.find_by_id(task_id).await?)
    }

    /// Checks whether a task may be moved manually to `new_state`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] when the task does not exist.
    pub async fn is_transition_allowed(
        &self,
        task_id: TaskId,
        new_state: TaskState,
    ) -> TaskerResult<bool> {
        Ok(self
            .lifecycle
            .is_transition_allowed(task_id, new_state)
            .await?)
    }

    /// Moves a task to the named state and propagates the change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown state name, a
    /// refused transition (naming the rule), or an unknown task.
    pub async fn set_state(&self, task_id: TaskId, new_state: &str) -> TaskerResult<StateUpdate> {
        Ok(self
            .lifecycle
            .set_state(SetStateRequest::new(task_id, new_state))
            .await?)
    }

    /// Stores the named state without consulting the transition rules, then
    /// propagates it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown state name or task.
    pub async fn force_state(&self, task_id: TaskId, new_state: &str) -> TaskerResult<StateUpdate> {
        Ok(self
            .lifecycle
            .force_state(SetStateRequest::new(task_id, new_state))
            .await?)
    }

    /// Reruns propagation over every task of a holder.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] when loading or storing fails.
    pub async fn refresh_holder(&self, holder: HolderRef) -> TaskerResult<Vec<StateChange>> {
        Ok(self.lifecycle.refresh_holder(holder).await?)
    }

    /// Appends a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for empty or overlong text or an
    /// unknown task.
    pub async fn add_comment(&self, task_id: TaskId, text: &str) -> TaskerResult<Comment> {
        Ok(self.lifecycle.add_comment(task_id, text).await?)
    }

    /// Assigns a task to the named user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] for an unknown user or
    /// [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn assign_user(&self, task_id: TaskId, user: &str) -> TaskerResult<Task> {
        let user_id = self.production.user(user).await?.id();
        Ok(self.lifecycle.assign_user(task_id, Some(user_id)).await?)
    }

    /// Clears a task's assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn unassign_user(&self, task_id: TaskId) -> TaskerResult<Task> {
        Ok(self.lifecycle.assign_user(task_id, None).await?)
    }

    /// Returns the prerequisites of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn dependencies_of(&self, task_id: TaskId) -> TaskerResult<Vec<Task>> {
        Ok(self.lifecycle.dependencies_of(task_id).await?)
    }

    /// Returns the tasks depending on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn dependents_of(&self, task_id: TaskId) -> TaskerResult<Vec<Task>> {
        Ok(self.lifecycle.dependents_of(task_id).await?)
    }

    /// Returns the direct subtasks of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn children_of(&self, task_id: TaskId) -> TaskerResult<Vec<Task>> {
        Ok(self.lifecycle.children_of(task_id).await?)
    }

    /// Returns the direct owner of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn parent_of(&self, task_id: TaskId) -> TaskerResult<TaskParent> {
        Ok(self.lifecycle.parent_of(task_id).await?)
    }

    /// Returns the asset or shot whose tree contains a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskerError::Production`] when the holder record is
    /// missing, or [`TaskerError::Lifecycle`] for an unknown task.
    pub async fn root_holder_of(&self, task_id: TaskId) -> TaskerResult<Holder> {
        let holder = self.lifecycle.root_holder_of(task_id).await?;
        Ok(self.production.holder(holder).await?)
    }
}
