//! Cache layout versions per product version
//!
//! A shared cache directory is named `<cache>-<n>` where `n` is the cache
//! layout version. The mapping records from which product version on each
//! layout version is used.

use crate::version::ProductVersion;
use std::collections::BTreeMap;
use workplan_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheVersionMapping {
    versions: BTreeMap<ProductVersion, u32>,
}

impl CacheVersionMapping {
    /// Start a mapping whose cache version 1 appeared in `product_version`
    pub fn introduced_in(product_version: &str) -> Result<CacheVersionMappingBuilder> {
        let introduced = ProductVersion::parse(product_version)?;
        Ok(CacheVersionMappingBuilder {
            versions: BTreeMap::from([(introduced.clone(), 1)]),
            latest_product: introduced,
            latest_cache: 1,
        })
    }

    /// The cache version written by the newest product version
    pub fn latest_version(&self) -> u32 {
        self.versions.values().next_back().copied().unwrap_or(1)
    }

    /// Cache version used by `product_version`, or `None` when that product
    /// version predates the cache
    pub fn version_used_by(&self, product_version: &ProductVersion) -> Option<u32> {
        self.versions
            .range(..=product_version)
            .next_back()
            .map(|(_, cache_version)| *cache_version)
    }
}

/// Builder enforcing strictly increasing cache and product versions
#[derive(Debug, Clone)]
pub struct CacheVersionMappingBuilder {
    versions: BTreeMap<ProductVersion, u32>,
    latest_product: ProductVersion,
    latest_cache: u32,
}

impl CacheVersionMappingBuilder {
    /// The cache moved to `cache_version` in `product_version`
    pub fn changed_to(mut self, cache_version: u32, product_version: &str) -> Result<Self> {
        let product_version = ProductVersion::parse(product_version)?;
        if cache_version <= self.latest_cache {
            return Err(Error::configuration(format!(
                "cache version {cache_version} must be greater than {}",
                self.latest_cache
            )));
        }
        if product_version <= self.latest_product {
            return Err(Error::configuration(format!(
                "product version {product_version} must be newer than {}",
                self.latest_product
            )));
        }
        self.versions.insert(product_version.clone(), cache_version);
        self.latest_product = product_version;
        self.latest_cache = cache_version;
        Ok(self)
    }

    /// The cache moved to the next cache version in `product_version`
    pub fn incremented_in(self, product_version: &str) -> Result<Self> {
        let next = self.latest_cache + 1;
        self.changed_to(next, product_version)
    }

    pub fn build(self) -> CacheVersionMapping {
        CacheVersionMapping {
            versions: self.versions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> ProductVersion {
        ProductVersion::parse(text).unwrap()
    }

    fn mapping() -> CacheVersionMapping {
        CacheVersionMapping::introduced_in("1.0")
            .unwrap()
            .incremented_in("1.2")
            .unwrap()
            .changed_to(5, "2.0-rc-1")
            .unwrap()
            .build()
    }

    #[test]
    fn test_latest_version_is_last_change() {
        assert_eq!(mapping().latest_version(), 5);
    }

    #[test]
    fn test_version_used_by_picks_floor_entry() {
        let mapping = mapping();
        assert_eq!(mapping.version_used_by(&v("0.9")), None);
        assert_eq!(mapping.version_used_by(&v("1.0")), Some(1));
        assert_eq!(mapping.version_used_by(&v("1.1.4")), Some(1));
        assert_eq!(mapping.version_used_by(&v("1.2")), Some(2));
        assert_eq!(mapping.version_used_by(&v("1.9")), Some(2));
        assert_eq!(mapping.version_used_by(&v("2.0-rc-1")), Some(5));
        assert_eq!(mapping.version_used_by(&v("2.0")), Some(5));
    }

    #[test]
    fn test_rejects_non_increasing_changes() {
        let builder = CacheVersionMapping::introduced_in("1.0").unwrap();
        assert!(builder.clone().changed_to(1, "1.1").is_err());
        assert!(builder.clone().changed_to(2, "1.0").is_err());
        assert!(builder.changed_to(2, "not-a-version").is_err());
    }
}
