//! When steps for task propagation BDD scenarios.

use super::world::{PropagationWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"task "{name}" is set to "{state}""#)]
fn task_is_set(
    world: &mut PropagationWorld,
    name: String,
    state: String,
) -> Result<(), eyre::Report> {
    let task = world.task(&name)?;
    let result = run_async(world.tasker.set_state(task.id(), &state));
    world.last_change = Some(result);
    Ok(())
}
