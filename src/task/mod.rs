//! Production task tracking and state propagation.
//!
//! Tasks belong to the task tree of an asset or shot, depend on other tasks
//! of the same tree, and carry a state, an optional assignee, and an
//! append-only comment log. Changing a task's state recomputes the automatic
//! states of every task downstream of it. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the propagation engine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
#[expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]
mod tests;
