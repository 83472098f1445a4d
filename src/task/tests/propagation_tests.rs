//! Unit tests for automatic state propagation.

use super::support::GraphSpec;
use crate::task::domain::{
    StateChange, TaskDomainError, TaskId, TaskState,
    propagation::{apply_state, automatic_state, propagate, recompute_self, refresh, seed},
};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;

use TaskState::{CanStart, Done, Hold, Omit, Pending, Reject, ToContinue, WorkInProgress};

#[rstest]
#[case(Pending, &[], Some(CanStart))]
#[case(CanStart, &[], None)]
#[case(Hold, &[], Some(ToContinue))]
#[case(WorkInProgress, &[Reject], Some(Hold))]
#[case(Done, &[Done, Reject], Some(Hold))]
#[case(Hold, &[Reject], None)]
#[case(Pending, &[Hold], Some(Hold))]
#[case(Hold, &[Done, Done], Some(ToContinue))]
#[case(Pending, &[Done, Done], Some(CanStart))]
#[case(WorkInProgress, &[Done], None)]
#[case(Omit, &[Done], None)]
#[case(Pending, &[Done, WorkInProgress], None)]
#[case(Hold, &[Done, ToContinue], None)]
fn automatic_state_follows_rules(
    #[case] current: TaskState,
    #[case] dependencies: &[TaskState],
    #[case] expected: Option<TaskState>,
) {
    assert_eq!(automatic_state(current, dependencies), expected);
}

#[rstest]
fn finishing_concept_unblocks_modeling() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("concept", CanStart, &[])
        .task("modeling", Pending, &["concept"])
        .build()?;
    let concept = named.id("concept")?;

    let changes = apply_state(&mut named.graph, concept, Done, &DefaultClock)?;

    assert_eq!(named.state("modeling")?, CanStart);
    assert_eq!(
        changes,
        vec![
            StateChange {
                task_id: concept,
                from: CanStart,
                to: Done
            },
            StateChange {
                task_id: named.id("modeling")?,
                from: Pending,
                to: CanStart
            },
        ]
    );
    Ok(())
}

#[rstest]
fn reject_locks_the_whole_downstream_chain() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("a", Done, &[])
        .task("b", Done, &["a"])
        .task("c", Pending, &["b"])
        .build()?;
    let a = named.id("a")?;

    apply_state(&mut named.graph, a, Reject, &DefaultClock)?;

    assert_eq!(named.state("b")?, Hold);
    assert_eq!(named.state("c")?, Hold);
    Ok(())
}

#[rstest]
fn held_chain_resumes_step_by_step() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("a", Reject, &[])
        .task("b", Hold, &["a"])
        .task("c", Hold, &["b"])
        .build()?;
    let (a, b) = (named.id("a")?, named.id("b")?);

    apply_state(&mut named.graph, a, Done, &DefaultClock)?;
    assert_eq!(named.state("b")?, ToContinue);
    assert_eq!(named.state("c")?, Hold);

    apply_state(&mut named.graph, b, Done, &DefaultClock)?;
    assert_eq!(named.state("c")?, ToContinue);
    Ok(())
}

#[rstest]
fn diamond_converges_regardless_of_sibling_order() -> eyre::Result<()> {
    let left_first = GraphSpec::new()
        .task("a", Done, &[])
        .task("b", Done, &["a"])
        .task("c", Done, &["a"])
        .task("d", WorkInProgress, &["b", "c"]);
    let right_first = GraphSpec::new()
        .task("a", Done, &[])
        .task("c", Done, &["a"])
        .task("b", Done, &["a"])
        .task("d", WorkInProgress, &["c", "b"]);

    let mut outcomes = Vec::new();
    for spec in [left_first, right_first] {
        let mut named = spec.build()?;
        let a = named.id("a")?;
        apply_state(&mut named.graph, a, Reject, &DefaultClock)?;
        let rejected = (named.state("b")?, named.state("c")?, named.state("d")?);
        apply_state(&mut named.graph, a, Done, &DefaultClock)?;
        let resumed = (named.state("b")?, named.state("c")?, named.state("d")?);
        outcomes.push((rejected, resumed));
    }

    ensure!(outcomes.windows(2).all(|pair| pair.first() == pair.last()));
    let Some(((_, _, d_rejected), (_, _, d_resumed))) = outcomes.first().copied() else {
        eyre::bail!("no outcome recorded");
    };
    assert_eq!(d_rejected, Hold);
    assert_eq!(d_resumed, Hold);
    Ok(())
}

#[rstest]
fn recompute_is_idempotent_once_converged() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("storyboard", Pending, &[])
        .task("animation", Pending, &["storyboard"])
        .task("lighting", Pending, &["animation"])
        .build()?;
    let storyboard = named.id("storyboard")?;

    let first = propagate(&mut named.graph, storyboard, &DefaultClock);
    ensure!(!first.is_empty(), "first pass should start the storyboard");
    let second = propagate(&mut named.graph, storyboard, &DefaultClock);
    ensure!(second.is_empty(), "second pass changed {second:?}");

    let ids: Vec<TaskId> = named.ids.values().copied().collect();
    for id in ids {
        ensure!(recompute_self(&mut named.graph, id, &DefaultClock).is_none());
    }
    Ok(())
}

#[rstest]
fn seed_starts_only_unblocked_tasks() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("concept", Pending, &[])
        .task("modeling", Pending, &["concept"])
        .build()?;

    let changes = seed(&mut named.graph, &DefaultClock);

    assert_eq!(changes.len(), 1);
    assert_eq!(named.state("concept")?, CanStart);
    assert_eq!(named.state("modeling")?, Pending);
    Ok(())
}

#[rstest]
fn refresh_repairs_inconsistent_states() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("concept", Reject, &[])
        .task("modeling", WorkInProgress, &["concept"])
        .task("texturing", CanStart, &["modeling"])
        .build()?;

    refresh(&mut named.graph, &DefaultClock);

    assert_eq!(named.state("modeling")?, Hold);
    assert_eq!(named.state("texturing")?, Hold);
    Ok(())
}

#[rstest]
fn manual_hold_with_finished_prerequisites_resumes_immediately() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("concept", Done, &[])
        .task("modeling", WorkInProgress, &["concept"])
        .build()?;
    let modeling = named.id("modeling")?;

    let changes = apply_state(&mut named.graph, modeling, Hold, &DefaultClock)?;

    assert_eq!(named.state("modeling")?, ToContinue);
    assert_eq!(changes.len(), 2);
    Ok(())
}

#[rstest]
fn applying_the_current_state_only_propagates() -> eyre::Result<()> {
    let mut named = GraphSpec::new()
        .task("concept", Done, &[])
        .task("modeling", Pending, &["concept"])
        .build()?;
    let concept = named.id("concept")?;

    let changes = apply_state(&mut named.graph, concept, Done, &DefaultClock)?;

    assert_eq!(
        changes.iter().map(|change| change.to).collect::<Vec<_>>(),
        vec![CanStart]
    );
    Ok(())
}

#[rstest]
fn applying_state_to_unknown_task_fails() -> eyre::Result<()> {
    let mut named = GraphSpec::new().task("concept", CanStart, &[]).build()?;
    let stranger = TaskId::new();

    assert_eq!(
        apply_state(&mut named.graph, stranger, Done, &DefaultClock),
        Err(TaskDomainError::TaskNotInGraph(stranger))
    );
    Ok(())
}
