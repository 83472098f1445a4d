//! Tasker: production task tracking for creative projects.
//!
//! Each project contains assets and shots, and each of those owns a tree of
//! tasks with dependencies, states, assigned users, and comments. The heart
//! of the crate is the propagation engine: the rules that decide when a task
//! may change state, and how one change cascades through the dependency
//! graph to unblock or re-block the tasks downstream of it.
//!
//! # Architecture
//!
//! Tasker follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete implementations of ports (in-memory storage)
//!
//! # Modules
//!
//! - [`task`]: Task states, transition rules, dependency graphs, and
//!   propagation
//! - [`template`]: Declarative task templates and their instantiation
//! - [`production`]: Projects, users, assets, and shots
//! - [`app`]: The [`Tasker`] facade wiring everything together
//! - [`config`] and [`logging`]: Runtime configuration and tracing setup

pub mod app;
pub mod config;
pub mod logging;
pub mod production;
pub mod task;
pub mod template;

pub use app::{Tasker, TaskerError, TaskerResult};
pub use config::TaskerConfig;
