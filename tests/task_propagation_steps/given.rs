//! Given steps for task propagation BDD scenarios.

use super::world::{PropagationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasker::production::domain::HolderKind;

#[given(r#"a project "{name}""#)]
fn a_project(world: &mut PropagationWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.tasker.new_project(&name)).wrap_err("create scenario project")?;
    world.project = Some(name);
    Ok(())
}

#[given(r#"an asset "{name}" built from "{template}""#)]
fn an_asset(
    world: &mut PropagationWorld,
    name: String,
    template: String,
) -> Result<(), eyre::Report> {
    let project = world
        .project
        .clone()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let created = run_async(world.tasker.new_holder_from_template(
        &project,
        HolderKind::Asset,
        &name,
        Some(&template),
    ))
    .wrap_err("create scenario asset")?;
    world.holder = Some(created.holder);
    Ok(())
}

#[given(r#"task "{name}" has been set to "{state}""#)]
fn task_has_been_set(
    world: &mut PropagationWorld,
    name: String,
    state: String,
) -> Result<(), eyre::Report> {
    let task = world.task(&name)?;
    run_async(world.tasker.set_state(task.id(), &state))
        .wrap_err_with(|| format!("set {name} to {state} in scenario setup"))?;
    Ok(())
}
