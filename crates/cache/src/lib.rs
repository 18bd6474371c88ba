//! Versioned cache directory reclamation for workplan
//!
//! Shared caches live in `<base>/<cache>-<n>` directories, one per cache
//! layout version `n`. This crate maps product versions to cache layout
//! versions and deletes layouts that neither the latest nor any recently
//! used product version still writes.

pub mod cleanup;
pub mod config;
pub mod mapping;
pub mod used_versions;
pub mod version;

pub use cleanup::{CleanupReport, VersionedCacheCleanup};
pub use config::CacheCleanupConfig;
pub use mapping::{CacheVersionMapping, CacheVersionMappingBuilder};
pub use used_versions::{RecentlyUsedVersionsProvider, VersionDirectoryScanner};
pub use version::ProductVersion;
pub use workplan_core::{Error, Result};
