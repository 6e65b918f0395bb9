//! Version specifier resolution
//!
//! Maps what the user typed to one concrete Go version. Cases are tried in
//! order, first match wins:
//!
//! | Specifier                     | Result                                            |
//! |-------------------------------|---------------------------------------------------|
//! | `""`, `None`                  | [`ResolveError::NoVersionProvided`]               |
//! | `latest`                      | newest stable version of the highest group having one |
//! | `dev-latest`                  | last entry of the highest group, prereleases included |
//! | `mod`                         | go.mod's version; a bare `X.Y` means `X.Y@latest` |
//! | `X.Y@latest`, `X.Yx`, `X.Y.x` | newest stable in `X.Y`, else its last prerelease  |
//! | `X.Y@dev-latest`              | last entry of `X.Y`, prereleases included         |
//! | concrete version              | itself, with `X.Y.0` collapsed to `X.Y` below 1.21 |
//! | anything else                 | itself; the download step decides if it exists    |
//!
//! Only the keyword and group cases consult the catalog, so concrete
//! versions resolve without network access.

use std::io::ErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::NONE_VERSION;
use crate::parser::GoMod;
use crate::version::catalog::{Catalog, VersionCatalog, VersionGroup};
use crate::version::error::ResolveError;
use crate::version::semver::{GroupKey, Version};

const LATEST: &str = "latest";
const DEV_LATEST: &str = "dev-latest";
const MOD: &str = "mod";
const LATEST_SUFFIX: &str = "@latest";
const DEV_LATEST_SUFFIX: &str = "@dev-latest";

static WILDCARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+)\.?x$").expect("valid wildcard regex"));

pub struct VersionResolver<'a> {
    catalog: &'a VersionCatalog,
    go_mod: &'a GoMod,
}

impl<'a> VersionResolver<'a> {
    pub fn new(catalog: &'a VersionCatalog, go_mod: &'a GoMod) -> Self {
        Self { catalog, go_mod }
    }

    pub fn resolve(&self, specifier: &str) -> Result<String, ResolveError> {
        let specifier = specifier.trim();
        if specifier.is_empty() || specifier == NONE_VERSION {
            return Err(ResolveError::NoVersionProvided);
        }

        let resolved = match specifier {
            LATEST => latest_stable(self.catalog.load()?)?,
            DEV_LATEST => latest_dev(self.catalog.load()?)?,
            MOD => self.declared()?,
            _ => {
                if let Some(base) = specifier.strip_suffix(LATEST_SUFFIX) {
                    self.group_latest(base)?
                } else if let Some(base) = specifier.strip_suffix(DEV_LATEST_SUFFIX) {
                    self.group_dev_latest(base)?
                } else if let Some(caps) = WILDCARD_RE.captures(specifier) {
                    self.group_latest(&caps[1])?
                } else {
                    Version::parse(specifier)
                        .map(|v| v.canonical())
                        .unwrap_or_else(|| specifier.to_string())
                }
            }
        };

        debug!("Resolved '{}' to {}", specifier, resolved);
        Ok(resolved)
    }

    fn declared(&self) -> Result<String, ResolveError> {
        let declared = match self.go_mod.declared_version() {
            Ok(Some(version)) => version,
            Ok(None) => return Err(ResolveError::NoDescriptorVersion),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ResolveError::NoDescriptorFile(
                    self.go_mod.path().display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if GroupKey::parse(&declared).is_some() {
            return self.group_latest(&declared);
        }
        Ok(declared)
    }

    fn group_latest(&self, base: &str) -> Result<String, ResolveError> {
        let catalog = self.catalog.load()?;
        let group = lookup_group(catalog, base)?;
        group
            .latest_stable()
            .or_else(|| group.latest())
            .map(|v| v.to_string())
            .ok_or_else(|| ResolveError::GroupNotFound(base.to_string()))
    }

    fn group_dev_latest(&self, base: &str) -> Result<String, ResolveError> {
        let catalog = self.catalog.load()?;
        lookup_group(catalog, base)?
            .latest()
            .map(|v| v.to_string())
            .ok_or_else(|| ResolveError::GroupNotFound(base.to_string()))
    }
}

fn lookup_group<'c>(
    catalog: &'c Catalog,
    base: &str,
) -> Result<&'c VersionGroup, ResolveError> {
    GroupKey::parse(base)
        .and_then(|key| catalog.group(key))
        .ok_or_else(|| ResolveError::GroupNotFound(base.to_string()))
}

fn latest_stable(catalog: &Catalog) -> Result<String, ResolveError> {
    catalog
        .groups()
        .rev()
        .find_map(|group| group.latest_stable())
        .map(|v| v.to_string())
        .ok_or(ResolveError::EmptyCatalog)
}

fn latest_dev(catalog: &Catalog) -> Result<String, ResolveError> {
    catalog
        .groups()
        .next_back()
        .and_then(|group| group.latest())
        .map(|v| v.to_string())
        .ok_or(ResolveError::EmptyCatalog)
}
