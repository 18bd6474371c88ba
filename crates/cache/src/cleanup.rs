//! Reclaiming obsolete versioned cache directories
//!
//! A base directory holds one `<cache>-<n>` subdirectory per cache layout
//! version. Directories older than the latest layout are deleted unless a
//! recently used product version still writes to them.

use crate::config::CacheCleanupConfig;
use crate::mapping::CacheVersionMapping;
use crate::used_versions::RecentlyUsedVersionsProvider;
use crate::version::ProductVersion;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::debug;
use walkdir::WalkDir;
use workplan_core::{Error, Result};
use workplan_utils::tracing::cleanup_span;

/// Outcome of one reclamation run, listing only directories that matched
/// the cache name pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub retained: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.retained.is_empty() && self.failed.is_empty()
    }
}

pub struct VersionedCacheCleanup<P> {
    config: CacheCleanupConfig,
    mapping: CacheVersionMapping,
    current: ProductVersion,
    provider: P,
    pattern: Regex,
}

impl<P: RecentlyUsedVersionsProvider> VersionedCacheCleanup<P> {
    pub fn new(
        config: CacheCleanupConfig,
        mapping: CacheVersionMapping,
        current: ProductVersion,
        provider: P,
    ) -> Result<Self> {
        config.validate()?;
        let pattern = cache_dir_pattern(&config.cache_name)?;
        Ok(Self {
            config,
            mapping,
            current,
            provider,
            pattern,
        })
    }

    pub fn config(&self) -> &CacheCleanupConfig {
        &self.config
    }

    /// Cache versions still written by product versions older than the
    /// current one
    pub fn used_cache_versions(&self) -> BTreeSet<u32> {
        self.provider
            .recently_used_versions()
            .iter()
            .filter(|version| **version < self.current)
            .filter_map(|version| self.mapping.version_used_by(version))
            .collect()
    }

    /// Parse the cache version out of a directory name, if it is one of ours
    pub fn cache_version_of(&self, dir_name: &str) -> Option<u32> {
        self.pattern
            .captures(dir_name)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Delete every obsolete cache directory below the base directory.
    ///
    /// Failures are logged at debug level and reported, never raised.
    pub fn delete_unused_cache_directories(&self) -> CleanupReport {
        let _span = cleanup_span(&self.config.cache_name).entered();
        let start = Instant::now();

        let latest = self.mapping.latest_version();
        let used = self.used_cache_versions();
        debug!(
            "Reclaiming {} directories in {} (latest {}, used {:?})",
            self.config.cache_name,
            self.config.base_dir.display(),
            latest,
            used
        );

        let mut report = CleanupReport::default();
        // Symlinked cache directories count as directories; deleting one
        // removes the link and leaves its target alone
        let entries = WalkDir::new(&self.config.base_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Failed to list {}: {}", self.config.base_dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(version) = entry
                .file_name()
                .to_str()
                .and_then(|name| self.cache_version_of(name))
            else {
                continue;
            };

            let path = entry.into_path();
            if version >= latest || used.contains(&version) {
                report.retained.push(path);
                continue;
            }

            match std::fs::remove_dir_all(&path) {
                Ok(()) => {
                    debug!("Deleted obsolete cache directory {}", path.display());
                    report.deleted.push(path);
                }
                Err(e) => {
                    let error = Error::file_system(path.clone(), "delete cache directory", e);
                    debug!("{error}");
                    report.failed.push(path);
                }
            }
        }

        debug!(
            "Processed versioned cache directories for name '{}' at {} in {:?}: {} deleted, {} retained, {} failed",
            self.config.cache_name,
            self.config.base_dir.display(),
            start.elapsed(),
            report.deleted.len(),
            report.retained.len(),
            report.failed.len()
        );
        report
    }
}

impl<P> VersionedCacheCleanup<P>
where
    P: RecentlyUsedVersionsProvider + Send + 'static,
{
    /// Run the reclamation on a blocking worker thread
    pub fn spawn_cleanup(self) -> JoinHandle<CleanupReport> {
        tokio::task::spawn_blocking(move || self.delete_unused_cache_directories())
    }
}

fn cache_dir_pattern(cache_name: &str) -> Result<Regex> {
    Regex::new(&format!("^{}-(0|[1-9][0-9]*)$", regex::escape(cache_name)))
        .map_err(|e| Error::configuration(format!("invalid cache name '{cache_name}': {e}")))
}
