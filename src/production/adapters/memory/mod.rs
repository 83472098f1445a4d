//! In-memory production storage.

mod holder;
mod project;
mod user;

pub use holder::InMemoryHolderRepository;
pub use project::InMemoryProjectRepository;
pub use user::InMemoryUserRepository;
