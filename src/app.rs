//! Command orchestration
//!
//! [`Gobrew`] resolves what the user asked for through the version resolver and
//! applies it through the toolchain store. Every verb returns a report value;
//! rendering is left to the binary.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::parser::GoMod;
use crate::prompt::Prompter;
use crate::toolchain::error::StoreError;
use crate::toolchain::extract::ReleaseExtractor;
use crate::toolchain::fetcher::HttpFetcher;
use crate::toolchain::{InstallOutcome, Layout, Platform, ToolchainStore};
use crate::version::cache::Cache;
use crate::version::catalog::VersionCatalog;
use crate::version::error::{CacheError, CatalogError, RegistryError, ResolveError};
use crate::version::registries::{GitHubReleases, GitHubTagsRegistry, http_client};
use crate::version::resolver::VersionResolver;
use crate::version::semver::GroupKey;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to clear version cache: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to check for updates: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub version: String,
    pub outcome: InstallOutcome,
    /// Set when the install also became the current version
    pub activated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    Switched,
    AlreadyCurrent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseReport {
    pub version: String,
    pub outcome: UseOutcome,
    /// Set when the version had to be downloaded first
    pub installed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    pub version: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteGroup {
    pub key: GroupKey,
    pub versions: Vec<String>,
}

/// Suggested change of the current version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    /// Nothing is current yet
    InstallLatest { specifier: String },
    /// The current version belongs to a different group than go.mod declares
    MatchGoMod { specifier: String },
    /// A newer stable release exists
    UpgradeToLatest { specifier: String },
}

impl Advice {
    pub fn specifier(&self) -> &str {
        match self {
            Advice::InstallLatest { specifier }
            | Advice::MatchGoMod { specifier }
            | Advice::UpgradeToLatest { specifier } => specifier,
        }
    }

    pub fn question(&self) -> String {
        match self {
            Advice::InstallLatest { specifier } => {
                format!("Do you want to use latest Go version ({})?", specifier)
            }
            Advice::MatchGoMod { specifier } => {
                format!(
                    "Do you want to use Go version same as go.mod version ({})?",
                    specifier
                )
            }
            Advice::UpgradeToLatest { specifier } => {
                format!("Do you want to update Go version to latest ({})?", specifier)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveReport {
    pub current: Option<String>,
    pub latest: String,
    /// Group declared by go.mod, when one exists in the working directory
    pub declared_group: Option<GroupKey>,
    pub advice: Option<Advice>,
    /// Result of applying the advice; `None` when there was none or it was declined
    pub applied: Option<UseReport>,
}

impl InteractiveReport {
    pub fn differs_from_go_mod(&self) -> bool {
        match (&self.current, self.declared_group) {
            (Some(current), Some(declared)) => GroupKey::of(current) != Some(declared),
            _ => false,
        }
    }

    pub fn is_latest(&self) -> bool {
        self.current.as_deref() == Some(self.latest.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfUpdateReport {
    pub current: String,
    pub latest_tag: String,
}

impl SelfUpdateReport {
    pub fn update_available(&self) -> bool {
        format!("v{}", self.current) != self.latest_tag
    }
}

pub struct Gobrew {
    catalog: VersionCatalog,
    store: ToolchainStore,
    go_mod: GoMod,
    releases: GitHubReleases,
}

impl Gobrew {
    pub fn new(
        catalog: VersionCatalog,
        store: ToolchainStore,
        go_mod: GoMod,
        releases: GitHubReleases,
    ) -> Self {
        Self {
            catalog,
            store,
            go_mod,
            releases,
        }
    }

    /// Wires the HTTP-backed collaborators for `config`, reading go.mod from `work_dir`
    pub fn from_config(config: &Config, work_dir: &Path) -> Result<Self, AppError> {
        let client = http_client()?;

        let cache = Cache::new(
            &config.cache_path(),
            config.cache_ttl,
            config.disable_cache,
        );
        let catalog = VersionCatalog::new(
            Box::new(GitHubTagsRegistry::new(client.clone(), &config.tags_url)),
            cache,
        );
        if config.clear_cache {
            info!("Clearing version cache");
            catalog.clear_cache()?;
        }

        let store = ToolchainStore::new(
            Layout::new(&config.install_dir),
            &config.registry_url,
            Platform::current(),
            Box::new(HttpFetcher::new(client.clone())),
            Box::new(ReleaseExtractor),
        );

        Ok(Self::new(
            catalog,
            store,
            GoMod::in_dir(work_dir),
            GitHubReleases::new(client, &config.releases_url),
        ))
    }

    pub fn store(&self) -> &ToolchainStore {
        &self.store
    }

    pub fn resolve(&self, specifier: &str) -> Result<String, ResolveError> {
        VersionResolver::new(&self.catalog, &self.go_mod).resolve(specifier)
    }

    /// Installs the resolved version; it becomes current when nothing else is
    pub fn install(&self, specifier: &str) -> Result<InstallReport, AppError> {
        let version = self.resolve(specifier)?;
        let outcome = self.store.install(&version)?;

        let activated = self.store.current_version().is_none();
        if activated {
            debug!("No current version, activating {}", version);
            self.store.use_version(&version)?;
        }

        Ok(InstallReport {
            version,
            outcome,
            activated,
        })
    }

    /// Makes the resolved version current, installing it first when needed
    pub fn use_version(&self, specifier: &str) -> Result<UseReport, AppError> {
        let version = self.resolve(specifier)?;

        if self.store.current_version().as_deref() == Some(version.as_str()) {
            return Ok(UseReport {
                version,
                outcome: UseOutcome::AlreadyCurrent,
                installed: false,
            });
        }

        let installed = self.store.install(&version)? == InstallOutcome::Installed;
        self.store.use_version(&version)?;

        Ok(UseReport {
            version,
            outcome: UseOutcome::Switched,
            installed,
        })
    }

    pub fn uninstall(&self, specifier: &str) -> Result<String, AppError> {
        let version = self.resolve(specifier)?;
        self.store.uninstall(&version)?;
        Ok(version)
    }

    pub fn prune(&self) -> Result<Vec<String>, AppError> {
        Ok(self.store.prune()?)
    }

    /// Installed versions with the current one marked
    pub fn list(&self) -> Result<Vec<InstalledEntry>, AppError> {
        let current = self.store.current_version();
        let entries = self
            .store
            .installed_versions()?
            .into_iter()
            .map(|version| InstalledEntry {
                current: current.as_deref() == Some(version.as_str()),
                version,
            })
            .collect();
        Ok(entries)
    }

    /// Remote versions by group, oldest group first
    pub fn list_remote(&self) -> Result<Vec<RemoteGroup>, AppError> {
        let grouped = self.catalog.load()?.grouped_names();
        Ok(grouped
            .into_iter()
            .map(|(key, versions)| RemoteGroup { key, versions })
            .collect())
    }

    /// Compares current, latest and go.mod versions and applies the first
    /// applicable advice, asking `prompter` first when `ask` is set
    pub fn interactive(
        &self,
        ask: bool,
        prompter: &dyn Prompter,
    ) -> Result<InteractiveReport, AppError> {
        let current = self.store.current_version();
        let latest = self.resolve("latest")?;
        let declared_group = self.declared_group()?;

        let mut report = InteractiveReport {
            current,
            latest,
            declared_group,
            advice: None,
            applied: None,
        };
        report.advice = advise(&report);

        if let Some(advice) = &report.advice {
            info!("Suggesting {:?}", advice);
            if !ask || prompter.confirm(&advice.question()) {
                report.applied = Some(self.use_version(advice.specifier())?);
            }
        }

        Ok(report)
    }

    pub fn check_self_update(&self, current: &str) -> Result<SelfUpdateReport, AppError> {
        let latest_tag = self.releases.latest_tag()?;
        Ok(SelfUpdateReport {
            current: current.to_string(),
            latest_tag,
        })
    }

    /// Group of the go.mod `go` directive; `None` without go.mod or directive
    fn declared_group(&self) -> Result<Option<GroupKey>, ResolveError> {
        if !self.go_mod.exists() {
            return Ok(None);
        }
        match self.resolve("mod") {
            Ok(version) => Ok(GroupKey::of(&version)),
            Err(ResolveError::NoDescriptorVersion) => {
                debug!("go.mod has no go directive");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn advise(report: &InteractiveReport) -> Option<Advice> {
    let Some(current) = &report.current else {
        return Some(Advice::InstallLatest {
            specifier: report.latest.clone(),
        });
    };

    if let Some(declared) = report.declared_group
        && GroupKey::of(current) != Some(declared)
    {
        return Some(Advice::MatchGoMod {
            specifier: format!("{}@latest", declared),
        });
    }

    (*current != report.latest).then(|| Advice::UpgradeToLatest {
        specifier: report.latest.clone(),
    })
}
