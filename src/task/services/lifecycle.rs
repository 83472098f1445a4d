//! Service layer for task state changes, comments, assignment, and queries.

use crate::production::domain::{HolderRef, UserId};
use crate::task::{
    domain::{
        Comment, ParseTaskStateError, StateChange, Task, TaskDomainError, TaskGraph, TaskId,
        TaskParent, TaskState, TransitionRejection, propagation,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Request payload for changing a task's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStateRequest {
    task_id: TaskId,
    target_state: String,
}

impl SetStateRequest {
    /// Creates a request moving `task_id` to the state named
    /// `target_state`.
    #[must_use]
    pub fn new(task_id: TaskId, target_state: impl Into<String>) -> Self {
        Self {
            task_id,
            target_state: target_state.into(),
        }
    }

    /// Creates a request from an already parsed state.
    #[must_use]
    pub fn for_state(task_id: TaskId, target_state: TaskState) -> Self {
        Self::new(task_id, target_state.as_str())
    }
}

/// Outcome of a state change: the updated task and every change applied,
/// the direct one first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    /// The task as stored after the change and its propagation.
    pub task: Task,
    /// Direct and propagated changes in application order.
    pub changes: Vec<StateChange>,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed, including refused transitions.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The requested state is not one of the recognised states.
    #[error(transparent)]
    InvalidState(#[from] ParseTaskStateError),
    /// No task has the given identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Returns the transition rule that refused a state change, if this
    /// error is a refused transition.
    #[must_use]
    pub const fn transition_rejection(&self) -> Option<&TransitionRejection> {
        match self {
            Self::Domain(TaskDomainError::InvalidTransition { reason, .. }) => Some(reason),
            _ => None,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutation runs under one gate, so a state change is validated,
/// applied, propagated, and committed before the next one starts.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    gate: Arc<Mutex<()>>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Returns every task matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn get_tasks(&self, filter: TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_matching(filter).await?)
    }

    /// Returns the dependency graph of a holder's task tree.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when stored dependencies point
    /// outside the holder or [`TaskLifecycleError::Repository`] when lookup
    /// fails.
    pub async fn holder_graph(&self, holder: HolderRef) -> TaskLifecycleResult<TaskGraph> {
        let tasks = self.repository.find_by_holder(holder).await?;
        Ok(TaskGraph::new(tasks)?)
    }

    /// Checks whether `task_id` may be moved manually to `new_state`.
    ///
    /// A refusal is reported as `Ok(false)` and logged as a warning naming
    /// the rule; nothing is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn is_transition_allowed(
        &self,
        task_id: TaskId,
        new_state: TaskState,
    ) -> TaskLifecycleResult<bool> {
        match self.check_transition(task_id, new_state).await {
            Ok(()) => Ok(true),
            Err(err) if err.transition_rejection().is_some() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Checks whether `task_id` may be moved manually to `new_state`,
    /// reporting the rule that refused it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] (wrapped in
    /// [`TaskLifecycleError::Domain`]) when a rule refuses the change.
    pub async fn check_transition(
        &self,
        task_id: TaskId,
        new_state: TaskState,
    ) -> TaskLifecycleResult<()> {
        let task = self.find_by_id(task_id).await?;
        let graph = self.holder_graph(task.holder()).await?;
        graph
            .check_transition(task_id, new_state)
            .inspect_err(|err| warn_refused(&task, err))?;
        Ok(())
    }

    /// Moves a task to a new state after validating the transition rules,
    /// then propagates the change through its dependents.
    ///
    /// The direct change and every propagated change are committed as one
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidState`] for an unknown state
    /// name, [`TaskLifecycleError::Domain`] when a transition rule refuses
    /// the change, [`TaskLifecycleError::NotFound`] for an unknown task, or
    /// [`TaskLifecycleError::Repository`] when persistence fails. Nothing is
    /// stored on error.
    pub async fn set_state(&self, request: SetStateRequest) -> TaskLifecycleResult<StateUpdate> {
        self.change_state(request, true).await
    }

    /// Stores a state without consulting the transition rules, then
    /// propagates it like [`Self::set_state`].
    ///
    /// Intended for administrative repair.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::set_state`] except refused
    /// transitions.
    pub async fn force_state(&self, request: SetStateRequest) -> TaskLifecycleResult<StateUpdate> {
        self.change_state(request, false).await
    }

    /// Reruns propagation over every task of a holder and commits any
    /// resulting changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when loading or persisting the tasks
    /// fails.
    pub async fn refresh_holder(&self, holder: HolderRef) -> TaskLifecycleResult<Vec<StateChange>> {
        let _guard = self.gate.lock().await;
        let mut graph = self.holder_graph(holder).await?;
        let changes = propagation::refresh(&mut graph, &*self.clock);
        self.commit(&graph, &changes).await?;
        Ok(changes)
    }

    /// Appends a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for empty or overlong text,
    /// [`TaskLifecycleError::NotFound`] for an unknown task, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        text: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Comment> {
        let _guard = self.gate.lock().await;
        let mut task = self.find_by_id(task_id).await?;
        let comment = task.add_comment(text, &*self.clock)?;
        self.repository.update_all(std::slice::from_ref(&task)).await?;
        Ok(comment)
    }

    /// Assigns a task to a user, or clears the assignment with `None`.
    ///
    /// Assignment does not affect task states.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn assign_user(
        &self,
        task_id: TaskId,
        user: Option<UserId>,
    ) -> TaskLifecycleResult<Task> {
        let _guard = self.gate.lock().await;
        let mut task = self.find_by_id(task_id).await?;
        task.assign_user(user, &*self.clock);
        self.repository.update_all(std::slice::from_ref(&task)).await?;
        info!(task = task.name(), ?user, "task assignment changed");
        Ok(task)
    }

    /// Returns the prerequisites of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or its holder graph
    /// cannot be loaded.
    pub async fn dependencies_of(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Task>> {
        self.related(task_id, |graph, id| graph.dependencies_of(id))
            .await
    }

    /// Returns the tasks that depend on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or its holder graph
    /// cannot be loaded.
    pub async fn dependents_of(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Task>> {
        self.related(task_id, |graph, id| graph.dependents_of(id))
            .await
    }

    /// Returns the direct subtasks of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or its holder graph
    /// cannot be loaded.
    pub async fn children_of(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Task>> {
        self.related(task_id, |graph, id| graph.children_of(id))
            .await
    }

    /// Returns the parent-task chain of a task, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or its holder graph
    /// cannot be loaded.
    pub async fn ancestors_of(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Task>> {
        self.related(task_id, |graph, id| graph.ancestors_of(id))
            .await
    }

    /// Returns the direct owner of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task.
    pub async fn parent_of(&self, task_id: TaskId) -> TaskLifecycleResult<TaskParent> {
        Ok(self.find_by_id(task_id).await?.parent())
    }

    /// Returns the asset or shot whose tree contains a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task.
    pub async fn root_holder_of(&self, task_id: TaskId) -> TaskLifecycleResult<HolderRef> {
        Ok(self.find_by_id(task_id).await?.holder())
    }

    async fn change_state(
        &self,
        request: SetStateRequest,
        validate: bool,
    ) -> TaskLifecycleResult<StateUpdate> {
        let SetStateRequest {
            task_id,
            target_state,
        } = request;
        let new_state = TaskState::try_from(target_state.as_str())?;

        let _guard = self.gate.lock().await;
        let task = self.find_by_id(task_id).await?;
        let mut graph = self.holder_graph(task.holder()).await?;
        if validate {
            graph
                .check_transition(task_id, new_state)
                .inspect_err(|err| warn_refused(&task, err))?;
        }

        let changes = propagation::apply_state(&mut graph, task_id, new_state, &*self.clock)?;
        self.commit(&graph, &changes).await?;

        let updated = graph
            .get(task_id)
            .cloned()
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        Ok(StateUpdate {
            task: updated,
            changes,
        })
    }

    /// Persists every task touched by `changes` as one batch.
    async fn commit(&self, graph: &TaskGraph, changes: &[StateChange]) -> TaskLifecycleResult<()> {
        let mut changed: Vec<TaskId> = Vec::new();
        for change in changes {
            if !changed.contains(&change.task_id) {
                changed.push(change.task_id);
            }
        }
        if changed.is_empty() {
            return Ok(());
        }
        let tasks: Vec<Task> = changed
            .iter()
            .filter_map(|id| graph.get(*id).cloned())
            .collect();
        self.repository.update_all(&tasks).await?;
        Ok(())
    }

    async fn related<F>(&self, task_id: TaskId, select: F) -> TaskLifecycleResult<Vec<Task>>
    where
        F: for<'g> Fn(&'g TaskGraph, TaskId) -> Vec<&'g Task> + Send,
    {
        let task = self.find_by_id(task_id).await?;
        let graph = self.holder_graph(task.holder()).await?;
        Ok(select(&graph, task_id).into_iter().cloned().collect())
    }
}

fn warn_refused(task: &Task, err: &TaskDomainError) {
    if let TaskDomainError::InvalidTransition { to, reason, .. } = err {
        warn!(
            task = task.name(),
            from = %task.state(),
            to = %to,
            %reason,
            "state change refused"
        );
    }
}
