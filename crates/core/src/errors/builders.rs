//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create an ordering cycle error from a rendered cycle report
    #[must_use]
    pub fn ordering_cycle(rendering: impl Into<String>) -> Self {
        Error::OrderingCycle {
            rendering: rendering.into(),
        }
    }

    #[must_use]
    pub fn cycle_break_limit(limit: usize) -> Self {
        Error::CycleBreakLimit { limit }
    }

    #[must_use]
    pub fn unplanned_task(task: impl Into<String>) -> Self {
        Error::UnplannedTask { task: task.into() }
    }

    #[must_use]
    pub fn task_already_finished(task: impl Into<String>) -> Self {
        Error::TaskAlreadyFinished { task: task.into() }
    }

    /// Create an invalid version error
    #[must_use]
    pub fn invalid_version(value: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidVersion {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error reports an ordering cycle
    pub fn is_ordering_cycle(&self) -> bool {
        matches!(self, Error::OrderingCycle { .. })
    }
}
