//! Sources of recently used product versions

use crate::version::ProductVersion;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Supplies the product versions that ran recently on this machine
pub trait RecentlyUsedVersionsProvider {
    fn recently_used_versions(&self) -> BTreeSet<ProductVersion>;
}

impl RecentlyUsedVersionsProvider for BTreeSet<ProductVersion> {
    fn recently_used_versions(&self) -> BTreeSet<ProductVersion> {
        self.clone()
    }
}

/// Treats every immediate subdirectory named after a product version as a
/// sign that this version was used recently, e.g. `caches/4.5.1/`.
#[derive(Debug, Clone)]
pub struct VersionDirectoryScanner {
    dir: PathBuf,
}

impl VersionDirectoryScanner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecentlyUsedVersionsProvider for VersionDirectoryScanner {
    fn recently_used_versions(&self) -> BTreeSet<ProductVersion> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Failed to scan {} for used versions: {}", self.dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| ProductVersion::parse(entry.file_name().to_str()?).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scanner_collects_version_directories_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("4.5.1")).unwrap();
        fs::create_dir(root.join("5.0-rc-1")).unwrap();
        fs::create_dir(root.join("modules-2")).unwrap();
        fs::create_dir_all(root.join("journal-1/6.0")).unwrap();
        fs::write(root.join("4.6"), b"not a directory").unwrap();

        let versions = VersionDirectoryScanner::new(root).recently_used_versions();
        let names: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["4.5.1", "5.0-rc-1"]);
    }

    #[test]
    fn test_scanner_tolerates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = VersionDirectoryScanner::new(temp_dir.path().join("missing"));
        assert!(scanner.recently_used_versions().is_empty());
    }
}
