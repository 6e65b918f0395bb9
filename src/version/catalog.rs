//! Remote version catalog
//!
//! Acquires the list of published Go versions (from the snapshot cache or the
//! tag registry) and buckets it into `major.minor` groups.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::TOOLCHAIN_PREFIX;
use crate::version::cache::Cache;
use crate::version::error::{CacheError, CatalogError};
use crate::version::registry::TagSource;
use crate::version::semver::{GroupKey, Version};

/// Groups that predate the `X.Y@latest` style naming this tool relies on.
pub const DENY_LISTED_GROUPS: &[GroupKey] = &[
    GroupKey { major: 1, minor: 0 },
    GroupKey { major: 1, minor: 1 },
    GroupKey { major: 1, minor: 2 },
    GroupKey { major: 1, minor: 3 },
    GroupKey { major: 1, minor: 4 },
];

/// Published versions sharing one `major.minor`.
///
/// Stable versions are kept in ascending numeric order. Prereleases keep the
/// order in which the remote listed them, which is not necessarily numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGroup {
    key: GroupKey,
    stable: Vec<Version>,
    prerelease: Vec<Version>,
}

impl VersionGroup {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            stable: Vec::new(),
            prerelease: Vec::new(),
        }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    /// Stable versions followed by prereleases
    pub fn combined(&self) -> impl DoubleEndedIterator<Item = &Version> {
        self.stable.iter().chain(self.prerelease.iter())
    }

    pub fn latest_stable(&self) -> Option<&Version> {
        self.stable.last()
    }

    /// Last element of the combined order
    pub fn latest(&self) -> Option<&Version> {
        self.combined().next_back()
    }

    pub fn len(&self) -> usize {
        self.stable.len() + self.prerelease.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    fetched_at: DateTime<Utc>,
    groups: BTreeMap<GroupKey, VersionGroup>,
}

impl Catalog {
    /// Builds the catalog from prefix-stripped version names.
    ///
    /// Unparseable names and deny-listed groups are dropped.
    pub fn from_versions(fetched_at: DateTime<Utc>, versions: &[String]) -> Self {
        let mut groups: BTreeMap<GroupKey, VersionGroup> = BTreeMap::new();

        for raw in versions {
            let Some(version) = Version::parse(raw) else {
                debug!("Skipping unrecognized version name '{}'", raw);
                continue;
            };

            let key = version.group_key();
            if DENY_LISTED_GROUPS.contains(&key) {
                continue;
            }

            let group = groups.entry(key).or_insert_with(|| VersionGroup::new(key));
            if version.is_stable() {
                group.stable.push(version);
            } else {
                group.prerelease.push(version);
            }
        }

        for group in groups.values_mut() {
            group.stable.sort();
        }

        Self { fetched_at, groups }
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn group(&self, key: GroupKey) -> Option<&VersionGroup> {
        self.groups.get(&key)
    }

    /// Groups in ascending key order
    pub fn groups(&self) -> impl DoubleEndedIterator<Item = &VersionGroup> {
        self.groups.values()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Plain `major.minor -> versions` view, combined order within each group
    pub fn grouped_names(&self) -> BTreeMap<GroupKey, Vec<String>> {
        self.groups
            .values()
            .map(|group| {
                (
                    group.key,
                    group.combined().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }
}

/// Cache-backed view of the remote catalog
///
/// The catalog is acquired at most once per instance.
pub struct VersionCatalog {
    source: Box<dyn TagSource>,
    cache: Cache,
    loaded: OnceCell<Catalog>,
}

impl VersionCatalog {
    pub fn new(source: Box<dyn TagSource>, cache: Cache) -> Self {
        Self {
            source,
            cache,
            loaded: OnceCell::new(),
        }
    }

    pub fn load(&self) -> Result<&Catalog, CatalogError> {
        self.load_at(Utc::now())
    }

    /// Returns the catalog, reading the cache or fetching as of `now`
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<&Catalog, CatalogError> {
        if let Some(catalog) = self.loaded.get() {
            return Ok(catalog);
        }

        let catalog = match self.cache.load(now) {
            Some(cached) => Catalog::from_versions(cached.fetched_at, &cached.versions),
            None => self.fetch(now)?,
        };

        Ok(self.loaded.get_or_init(|| catalog))
    }

    pub fn clear_cache(&self) -> Result<(), CacheError> {
        self.cache.clear()
    }

    fn fetch(&self, now: DateTime<Utc>) -> Result<Catalog, CatalogError> {
        info!("Fetching remote versions");
        let tags = self.source.fetch_tags()?;

        let versions: Vec<String> = tags
            .iter()
            .filter_map(|tag| tag.strip_prefix(TOOLCHAIN_PREFIX))
            .map(str::to_string)
            .collect();
        debug!("Fetched {} version tags", versions.len());

        let _ = self
            .cache
            .store(now, &versions)
            .inspect_err(|e| warn!("Failed to save version cache: {}", e));

        Ok(Catalog::from_versions(now, &versions))
    }
}
