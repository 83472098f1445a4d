//! Unit tests for the task aggregate and its comments.

use super::support::task;
use crate::production::domain::{HolderKind, HolderRef, UserId};
use crate::task::domain::{Comment, Task, TaskDomainError, TaskParent, TaskState};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn new_task_is_startable_top_level_task(clock: DefaultClock) -> eyre::Result<()> {
    let holder = HolderRef::new(HolderKind::Shot);
    let created = Task::new(holder, "  animation ", &clock)?;

    assert_eq!(created.name(), "animation");
    assert_eq!(created.state(), TaskState::CanStart);
    assert_eq!(created.parent(), TaskParent::Holder(holder));
    assert!(created.is_top_level());
    assert!(created.comments().is_empty());
    assert_eq!(created.assignee(), None);
    assert_eq!(created.created_at(), created.updated_at());
    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_task_names_are_rejected(#[case] name: &str, clock: DefaultClock) {
    let result = Task::new(HolderRef::new(HolderKind::Asset), name, &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyTaskName));
}

#[rstest]
fn task_names_are_bounded(clock: DefaultClock) {
    let holder = HolderRef::new(HolderKind::Asset);
    assert!(Task::new(holder, "x".repeat(50), &clock).is_ok());
    assert!(matches!(
        Task::new(holder, "x".repeat(51), &clock),
        Err(TaskDomainError::TaskNameTooLong(_))
    ));
}

#[rstest]
fn dependencies_drop_duplicates_and_self_references() -> eyre::Result<()> {
    let concept = task("concept")?;
    let modeling = task("modeling")?;
    let modeling_id = modeling.id();
    let linked =
        modeling.with_dependencies([concept.id(), concept.id(), modeling_id]);

    assert_eq!(linked.dependencies(), &[concept.id()]);
    assert!(linked.has_dependencies());
    Ok(())
}

#[rstest]
fn subtask_reports_parent_task() -> eyre::Result<()> {
    let parent = task("texturing")?;
    let child = task("uv_layout")?.with_parent_task(parent.id());

    assert_eq!(child.parent(), TaskParent::Task(parent.id()));
    assert!(!child.is_top_level());
    Ok(())
}

#[rstest]
fn overwrite_state_reports_previous_state_only_on_change(clock: DefaultClock) -> eyre::Result<()> {
    let mut created = task("lighting")?;

    assert_eq!(
        created.overwrite_state(TaskState::WorkInProgress, &clock),
        Some(TaskState::CanStart)
    );
    assert_eq!(created.overwrite_state(TaskState::WorkInProgress, &clock), None);
    assert_eq!(created.state(), TaskState::WorkInProgress);
    Ok(())
}

#[rstest]
fn comments_append_in_chronological_order(clock: DefaultClock) -> eyre::Result<()> {
    let mut created = task("rigging")?;
    let first = created.add_comment("needs more joints", &clock)?;
    let second = created.add_comment("  fixed  ", &clock)?;

    assert_eq!(first.task_id(), created.id());
    assert_eq!(second.text(), "fixed");
    let texts: Vec<&str> = created.comments().iter().map(Comment::text).collect();
    assert_eq!(texts, vec!["needs more joints", "fixed"]);
    assert!(first.created_at() <= second.created_at());
    Ok(())
}

#[rstest]
fn invalid_comments_leave_the_log_untouched(clock: DefaultClock) -> eyre::Result<()> {
    let mut created = task("grooming")?;

    assert_eq!(
        created.add_comment(" ", &clock),
        Err(TaskDomainError::EmptyComment)
    );
    assert_eq!(
        created.add_comment("y".repeat(201), &clock),
        Err(TaskDomainError::CommentTooLong(created.id()))
    );
    assert!(created.add_comment("y".repeat(200), &clock).is_ok());
    assert_eq!(created.comments().len(), 1);
    Ok(())
}

#[rstest]
fn assignment_can_be_set_and_cleared(clock: DefaultClock) -> eyre::Result<()> {
    let mut created = task("concept")?;
    let user = UserId::new();

    created.assign_user(Some(user), &clock);
    assert_eq!(created.assignee(), Some(user));
    created.assign_user(None, &clock);
    assert_eq!(created.assignee(), None);
    Ok(())
}
