//! Behaviour tests for dependency-driven task state propagation.

#[path = "task_propagation_steps/mod.rs"]
mod task_propagation_steps_defs;

use rstest_bdd_macros::scenario;
use task_propagation_steps_defs::world::{PropagationWorld, world};

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "New asset opens only its first task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn new_asset_opens_first_task(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "Finishing a prerequisite unlocks its dependent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_prerequisite_unlocks_dependent(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "A task waits for every prerequisite"
)]
#[tokio::test(flavor = "multi_thread")]
async fn task_waits_for_every_prerequisite(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "Rejecting a prerequisite holds the downstream chain"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_holds_downstream_chain(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "Held work resumes one step at a time"
)]
#[tokio::test(flavor = "multi_thread")]
async fn held_work_resumes_step_by_step(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "Working on a task with open prerequisites is refused"
)]
#[tokio::test(flavor = "multi_thread")]
async fn open_prerequisites_refuse_work(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "A finished task can only be rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn finished_task_only_rejects(world: PropagationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_propagation.feature",
    name = "Unknown state names are refused"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_state_names_refused(world: PropagationWorld) {
    let _ = world;
}
