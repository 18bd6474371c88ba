use std::env;
use std::path::{Path, PathBuf};
use workplan_core::APP_DIR_NAME;

/// XDG Base Directory paths for workplan
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CACHE_HOME/workplan or fallback
    pub fn cache_dir() -> PathBuf {
        Self::resolve(
            env::var("XDG_CACHE_HOME").ok(),
            dirs::home_dir().as_deref(),
            ".cache",
        )
    }

    fn resolve(xdg_value: Option<String>, home: Option<&Path>, fallback: &str) -> PathBuf {
        xdg_value
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                home.map(|home| home.join(fallback))
                    .unwrap_or_else(|| PathBuf::from(fallback))
            })
            .join(APP_DIR_NAME)
    }
}
