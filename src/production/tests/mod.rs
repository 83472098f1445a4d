//! Unit tests for the production context.

mod repository_tests;
