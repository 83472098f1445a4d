//! Creating task trees from templates.

use crate::production::domain::{HolderKind, HolderRef};
use crate::task::domain::{Task, TaskState};
use crate::template::domain::{
    DEFAULT_ASSET_TEMPLATE, TaskSpec, TaskTemplate, TemplateCatalog, instantiate,
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
fn prerequisite_free_tasks_start_open() -> eyre::Result<()> {
    let catalog = TemplateCatalog::builtin();
    let template = catalog.get(HolderKind::Asset, DEFAULT_ASSET_TEMPLATE)?;
    let holder = HolderRef::new(HolderKind::Asset);

    let graph = instantiate(template, holder, &DefaultClock)?;

    let concept = graph
        .find_top_level("concept")
        .ok_or_else(|| eyre::eyre!("concept missing"))?;
    let modeling = graph
        .find_top_level("modeling")
        .ok_or_else(|| eyre::eyre!("modeling missing"))?;
    let texturing = graph
        .find_top_level("texturing")
        .ok_or_else(|| eyre::eyre!("texturing missing"))?;
    assert_eq!(concept.state(), TaskState::CanStart);
    assert_eq!(modeling.state(), TaskState::Pending);
    assert_eq!(texturing.state(), TaskState::Pending);
    assert_eq!(modeling.dependencies(), [concept.id()]);
    assert_eq!(texturing.dependencies(), [concept.id(), modeling.id()]);
    assert!(graph.tasks().all(|task| task.holder() == holder));
    Ok(())
}

#[rstest]
fn tasks_keep_template_order() -> eyre::Result<()> {
    let catalog = TemplateCatalog::builtin();
    let template = catalog.get(HolderKind::Shot, "feature_animation_shot")?;

    let tasks = instantiate(template, HolderRef::new(HolderKind::Shot), &DefaultClock)?.into_tasks();

    let created: Vec<&str> = tasks.iter().map(Task::name).collect();
    let declared: Vec<&str> = template.tasks().iter().map(TaskSpec::name).collect();
    assert_eq!(created, declared);
    Ok(())
}

#[rstest]
fn subtasks_are_linked_to_their_parent() -> eyre::Result<()> {
    let template = TaskTemplate::new(
        "lookdev",
        [
            TaskSpec::new("texturing"),
            TaskSpec::new("uv_layout").child_of("texturing"),
            TaskSpec::new("paint").child_of("texturing").depends_on(["uv_layout"]),
        ],
    )?;

    let graph = instantiate(&template, HolderRef::new(HolderKind::Asset), &DefaultClock)?;

    let texturing = graph
        .find_top_level("texturing")
        .ok_or_else(|| eyre::eyre!("texturing missing"))?;
    let children = graph.children_of(texturing.id());
    let names: Vec<&str> = children.iter().map(|task| task.name()).collect();
    assert_eq!(names, ["uv_layout", "paint"]);
    assert!(children.iter().all(|task| task.parent_task() == Some(texturing.id())));
    assert!(graph.find_top_level("paint").is_none());
    Ok(())
}
