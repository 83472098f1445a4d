//! Task templates for assets and shots.
//!
//! A template names the tasks a new holder receives and the prerequisites
//! between them. Templates are validated when they are built or loaded, so
//! instantiation never meets a dangling or cyclic dependency.

pub mod domain;

#[cfg(test)]
#[expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]
mod tests;
