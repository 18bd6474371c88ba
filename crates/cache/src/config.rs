//! Reclaimer configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use workplan_core::{Error, Result, DEFAULT_CACHE_NAME};
use workplan_utils::xdg::XdgPaths;

/// Where versioned cache directories live and what they are called
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheCleanupConfig {
    /// Directory holding `<cache_name>-<version>` subdirectories
    pub base_dir: PathBuf,
    pub cache_name: String,
}

impl Default for CacheCleanupConfig {
    fn default() -> Self {
        // Use XDG cache directory which respects XDG_CACHE_HOME
        Self {
            base_dir: XdgPaths::cache_dir(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
        }
    }
}

impl CacheCleanupConfig {
    pub fn new(base_dir: impl Into<PathBuf>, cache_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache_name: cache_name.into(),
        }
    }

    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The cache name becomes part of directory names, so it must be a
    /// single non-empty path component
    pub fn validate(&self) -> Result<()> {
        if self.cache_name.is_empty() {
            return Err(Error::configuration("cache name must not be empty"));
        }
        if self.cache_name.contains(['/', '\\']) {
            return Err(Error::configuration(format!(
                "cache name '{}' must not contain path separators",
                self.cache_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_partial_json() {
        let config = CacheCleanupConfig::from_json_str(r#"{"cacheName": "transforms"}"#).unwrap();
        assert_eq!(config.cache_name, "transforms");
        assert_eq!(config.base_dir, CacheCleanupConfig::default().base_dir);
    }

    #[test]
    fn test_rejects_bad_cache_names() {
        assert!(CacheCleanupConfig::from_json_str(r#"{"cacheName": ""}"#).is_err());
        assert!(CacheCleanupConfig::new("/tmp", "a/b").validate().is_err());
        assert!(CacheCleanupConfig::new("/tmp", "jars").validate().is_ok());
    }
}
