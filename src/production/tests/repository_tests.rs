//! In-memory production repository behaviour.

use crate::production::{
    adapters::memory::{InMemoryHolderRepository, InMemoryProjectRepository, InMemoryUserRepository},
    domain::{Holder, HolderKind, Project, ProjectId, User},
    ports::{HolderRepository, ProductionRepositoryError, ProjectRepository, UserRepository},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::DefaultClock;
use rstest::rstest;

fn asset(project_id: ProjectId, name: &str) -> eyre::Result<(Holder, Vec<Task>)> {
    let holder = Holder::new(HolderKind::Asset, project_id, name, "custom", &DefaultClock)?;
    let tasks = vec![
        Task::new(holder.id(), "concept", &DefaultClock)?,
        Task::new(holder.id(), "modeling", &DefaultClock)?,
    ];
    Ok((holder, tasks))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_names_are_unique() -> eyre::Result<()> {
    let repository = InMemoryProjectRepository::new();
    let first = Project::new("Spring", &DefaultClock)?;
    let second = Project::new("Spring", &DefaultClock)?;

    repository.store(&first).await?;
    let result = repository.store(&second).await;

    assert!(matches!(
        result,
        Err(ProductionRepositoryError::DuplicateProjectName(name)) if name == "Spring"
    ));
    assert_eq!(repository.list_all().await?, vec![first.clone()]);
    assert_eq!(repository.find_by_name("Spring").await?, Some(first));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_are_listed_in_registration_order() -> eyre::Result<()> {
    let repository = InMemoryUserRepository::new();
    let ada = User::new("ada", &DefaultClock)?;
    let bo = User::new("bo", &DefaultClock)?;
    repository.store(&ada).await?;
    repository.store(&bo).await?;

    let names: Vec<String> = repository
        .list_all()
        .await?
        .iter()
        .map(|user| user.name().to_owned())
        .collect();

    assert_eq!(names, ["ada", "bo"]);
    assert_eq!(repository.find_by_id(bo.id()).await?, Some(bo));
    assert!(matches!(
        repository.store(&User::new("ada", &DefaultClock)?).await,
        Err(ProductionRepositoryError::DuplicateUserName(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn holder_creation_stores_its_tasks() -> eyre::Result<()> {
    let tasks = InMemoryTaskRepository::new();
    let holders = InMemoryHolderRepository::new(tasks.clone());
    let project_id = ProjectId::new();
    let (holder, created) = asset(project_id, "teapot")?;

    holders.create(&holder, &created).await?;

    assert_eq!(tasks.find_by_holder(holder.id()).await?.len(), 2);
    assert_eq!(
        holders
            .find_by_name(project_id, HolderKind::Asset, "teapot")
            .await?,
        Some(holder.clone())
    );
    assert!(
        holders
            .find_by_name(project_id, HolderKind::Shot, "teapot")
            .await?
            .is_none()
    );
    assert_eq!(
        holders.list_by_project(project_id, HolderKind::Asset).await?,
        vec![holder]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_holder_name_stores_nothing() -> eyre::Result<()> {
    let tasks = InMemoryTaskRepository::new();
    let holders = InMemoryHolderRepository::new(tasks.clone());
    let project_id = ProjectId::new();
    let (first, first_tasks) = asset(project_id, "teapot")?;
    let (second, second_tasks) = asset(project_id, "teapot")?;
    holders.create(&first, &first_tasks).await?;

    let result = holders.create(&second, &second_tasks).await;

    assert!(matches!(
        result,
        Err(ProductionRepositoryError::DuplicateHolderName { name, .. }) if name == "teapot"
    ));
    assert!(tasks.find_by_holder(second.id()).await?.is_empty());
    assert!(holders.find_by_id(second.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_name_in_another_project_is_allowed() -> eyre::Result<()> {
    let holders = InMemoryHolderRepository::new(InMemoryTaskRepository::new());
    let (first, first_tasks) = asset(ProjectId::new(), "teapot")?;
    let (second, second_tasks) = asset(ProjectId::new(), "teapot")?;

    holders.create(&first, &first_tasks).await?;
    holders.create(&second, &second_tasks).await?;

    assert!(holders.find_by_id(second.id()).await?.is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_task_batch_leaves_holder_unregistered() -> eyre::Result<()> {
    let tasks = InMemoryTaskRepository::new();
    let holders = InMemoryHolderRepository::new(tasks.clone());
    let project_id = ProjectId::new();
    let (holder, created) = asset(project_id, "teapot")?;
    tasks.store_all(&created).await?;

    let result = holders.create(&holder, &created).await;

    assert!(matches!(
        result,
        Err(ProductionRepositoryError::Tasks(TaskRepositoryError::DuplicateTask(_)))
    ));
    assert!(
        holders
            .find_by_name(project_id, HolderKind::Asset, "teapot")
            .await?
            .is_none()
    );
    Ok(())
}
