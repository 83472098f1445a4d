//! Application services for task state changes and queries.

mod lifecycle;

pub use lifecycle::{
    SetStateRequest, StateUpdate, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
