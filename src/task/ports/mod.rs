//! Storage contracts the task services depend on.

pub mod repository;

pub use repository::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
