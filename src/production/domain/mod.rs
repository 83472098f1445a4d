//! Domain model for projects, users, and the assets and shots that hold
//! task trees.

mod error;
mod holder;
mod ids;
mod project;

pub use error::ProductionDomainError;
pub use holder::Holder;
pub use ids::{AssetId, HolderKind, HolderRef, ProjectId, ShotId, UserId};
pub use project::{Project, User};
