//! Projects, users, and the assets and shots that own task trees.
//!
//! Holders are created from templates: the template's task set is
//! instantiated, propagated, and stored together with the holder.

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
