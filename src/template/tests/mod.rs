//! Unit tests for the template context.

mod instantiate_tests;
