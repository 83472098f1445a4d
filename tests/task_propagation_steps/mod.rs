//! Step definitions for task propagation scenarios.

pub mod world;

mod given;
mod then;
mod when;
