//! Then steps for task propagation BDD scenarios.

use super::world::PropagationWorld;
use rstest_bdd_macros::then;
use tasker::TaskerError;
use tasker::task::{
    domain::{TaskState, TransitionRejection},
    services::TaskLifecycleError,
};

#[then(r#"task "{name}" is "{state}""#)]
fn task_is(world: &PropagationWorld, name: String, state: String) -> Result<(), eyre::Report> {
    let expected = TaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let task = world.task(&name)?;
    if task.state() != expected {
        return Err(eyre::eyre!(
            "expected {name} to be {expected}, found {}",
            task.state()
        ));
    }
    Ok(())
}

fn refusal(world: &PropagationWorld) -> Result<TransitionRejection, eyre::Report> {
    let result = world
        .last_change
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing state change result"))?;
    match result {
        Err(TaskerError::Lifecycle(err)) => err
            .transition_rejection()
            .cloned()
            .ok_or_else(|| eyre::eyre!("expected a refused transition, got {err:?}")),
        other => Err(eyre::eyre!("expected a refused transition, got {other:?}")),
    }
}

#[then("the change is refused because prerequisites are not done")]
fn refused_for_prerequisites(world: &PropagationWorld) -> Result<(), eyre::Report> {
    let reason = refusal(world)?;
    if !matches!(reason, TransitionRejection::DependenciesIncomplete { ref blocking } if !blocking.is_empty())
    {
        return Err(eyre::eyre!("expected incomplete prerequisites, got {reason:?}"));
    }
    Ok(())
}

#[then("the change is refused because the task is done")]
fn refused_for_done(world: &PropagationWorld) -> Result<(), eyre::Report> {
    let reason = refusal(world)?;
    if reason != TransitionRejection::DoneRequiresReject {
        return Err(eyre::eyre!("expected done-requires-reject, got {reason:?}"));
    }
    Ok(())
}

#[then("the change is refused as an unknown state")]
fn refused_as_unknown_state(world: &PropagationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_change
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing state change result"))?;
    if !matches!(
        result,
        Err(TaskerError::Lifecycle(TaskLifecycleError::InvalidState(_)))
    ) {
        return Err(eyre::eyre!("expected an invalid state error, got {result:?}"));
    }
    Ok(())
}
