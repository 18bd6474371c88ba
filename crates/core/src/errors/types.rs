//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for workplan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workplan operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cycle of dependency or must-run-after edges that no
    /// should-run-after removal can break. The rendering already carries
    /// the report header.
    #[error("{rendering}")]
    OrderingCycle { rendering: String },

    /// The configured fuel for should-run-after removals ran out
    #[error("gave up breaking ordering cycles after removing {limit} should-run-after edges")]
    CycleBreakLimit { limit: usize },

    /// Completion reported for a task that is not part of the plan
    #[error("task '{task}' is not part of the execution plan")]
    UnplannedTask { task: String },

    /// Completion reported twice for the same task
    #[error("task '{task}' has already finished executing")]
    TaskAlreadyFinished { task: String },

    #[error("the execution plan has already been determined")]
    PlanAlreadyDetermined,

    #[error("the execution plan has not been determined yet")]
    PlanNotDetermined,

    /// Product version strings that cannot be parsed or ordered
    #[error("invalid version '{value}': {message}")]
    InvalidVersion { value: String, message: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{}': {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
