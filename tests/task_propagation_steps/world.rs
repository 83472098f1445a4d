//! Shared world state for task propagation BDD scenarios.

use rstest::fixture;
use tasker::production::domain::Holder;
use tasker::task::domain::Task;
use tasker::task::services::StateUpdate;
use tasker::{Tasker, TaskerResult};

/// Scenario world for propagation behaviour tests.
pub struct PropagationWorld {
    pub tasker: Tasker,
    pub project: Option<String>,
    pub holder: Option<Holder>,
    pub last_change: Option<TaskerResult<StateUpdate>>,
}

impl PropagationWorld {
    /// Creates a world over an empty tracker with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasker: Tasker::new(),
            project: None,
            holder: None,
            last_change: None,
        }
    }

    /// Looks up a top-level task of the scenario's asset by name.
    pub fn task(&self, name: &str) -> Result<Task, eyre::Report> {
        let holder = self
            .holder
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing asset in scenario world"))?;
        Ok(run_async(self.tasker.holder_task(holder.id(), name))?)
    }
}

impl Default for PropagationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PropagationWorld {
    PropagationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
