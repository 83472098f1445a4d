//! Adapter implementations of the production ports.

pub mod memory;
