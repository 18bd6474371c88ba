//! Shared utilities for workplan
//!
//! Logging setup and platform path resolution used by the planner and the
//! cache reclaimer.

pub mod tracing;
pub mod xdg;

pub use xdg::*;
