//! Error types for workplan operations

mod builders;
mod conversions;
mod types;

pub use types::{Error, Result};
