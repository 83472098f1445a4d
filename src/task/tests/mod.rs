//! Unit tests for the task context.

mod domain_tests;
mod propagation_tests;
mod support;
