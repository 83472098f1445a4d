//! Port definitions for production persistence.

mod repository;

pub use repository::{
    HolderRepository, ProductionRepositoryError, ProductionRepositoryResult, ProjectRepository,
    UserRepository,
};
