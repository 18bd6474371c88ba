/// Constants used throughout the workplan codebase
// Environment variable names
pub const WORKPLAN_LOG_VAR: &str = "WORKPLAN_LOG";

// Default log filter when WORKPLAN_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

// First line of every ordering cycle report
pub const CYCLE_REPORT_HEADER: &str = "Circular dependency between the following tasks:";

// Application directory name below the XDG base directories
pub const APP_DIR_NAME: &str = "workplan";

// Cache name used when no configuration is supplied
pub const DEFAULT_CACHE_NAME: &str = "caches";
