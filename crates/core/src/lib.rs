//! Core error types and constants shared by the `workplan` crates.
//!
//! ## Key Components
//!
//! - **`errors`**: the workspace-wide `Error` enum and `Result` alias. Planning
//!   failures, precondition violations and configuration problems all funnel
//!   through it so callers handle one type.
//! - **`constants`**: shared static values such as the logging environment
//!   variable and the cycle report header.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
