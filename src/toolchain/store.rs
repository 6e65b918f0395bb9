//! Installed toolchains and the current-version links
//!
//! Each version directory moves through
//! `Absent -> Installed -> Absent`; at most one installed version is
//! `Current`, as recorded by the `current/bin` and `current/go` links.
//!
//! Switching versions replaces `current/bin` first and `current/go` second.
//! Each replacement is atomic, the pair is not: a crash in between leaves the
//! two links pointing at different versions until the next `use`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::toolchain::error::StoreError;
use crate::toolchain::extract::ArchiveExtractor;
use crate::toolchain::fetcher::ArtifactFetcher;
use crate::toolchain::layout::Layout;
use crate::toolchain::link::replace_link;
use crate::toolchain::platform::{Platform, archive_url};
use crate::version::semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

pub struct ToolchainStore {
    layout: Layout,
    registry_url: String,
    platform: Platform,
    fetcher: Box<dyn ArtifactFetcher>,
    extractor: Box<dyn ArchiveExtractor>,
}

impl ToolchainStore {
    pub fn new(
        layout: Layout,
        registry_url: &str,
        platform: Platform,
        fetcher: Box<dyn ArtifactFetcher>,
        extractor: Box<dyn ArchiveExtractor>,
    ) -> Self {
        Self {
            layout,
            registry_url: registry_url.to_string(),
            platform,
            fetcher,
            extractor,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// True when `versions/<version>/go` is present
    pub fn exists(&self, version: &str) -> bool {
        self.layout
            .toolchain_dir(version)
            .is_ok_and(|dir| dir.exists())
    }

    /// Downloads and unpacks `version` unless it is already installed.
    ///
    /// A failed attempt removes the version directory, so `exists` never
    /// reports a partial install. The downloads directory is removed either way.
    pub fn install(&self, version: &str) -> Result<InstallOutcome, StoreError> {
        let version_dir = self.layout.version_dir(version)?;

        if self.exists(version) {
            info!("Version {} is already installed", version);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let result = self
            .create_dirs(&version_dir)
            .and_then(|()| self.download_and_extract(version, &version_dir));

        self.clean_downloads();

        if let Err(e) = result {
            warn!("Install of {} failed, cleaning up: {}", version, e);
            remove_dir_if_present(&version_dir);
            return Err(e);
        }

        info!("Installed version {}", version);
        Ok(InstallOutcome::Installed)
    }

    /// Points the current links at an installed `version`
    pub fn use_version(&self, version: &str) -> Result<(), StoreError> {
        if !self.exists(version) {
            return Err(StoreError::NotInstalled(version.to_string()));
        }

        let current_dir = self.layout.current_dir();
        fs::create_dir_all(&current_dir).map_err(StoreError::io(&current_dir))?;

        let bin_target = self.layout.toolchain_bin_dir(version)?;
        let bin_link = self.layout.current_bin();
        replace_link(&bin_target, &bin_link).map_err(StoreError::io(&bin_link))?;

        let go_target = self.layout.toolchain_dir(version)?;
        let go_link = self.layout.current_go();
        replace_link(&go_target, &go_link).map_err(StoreError::io(&go_link))?;

        info!("Current version is now {}", version);
        Ok(())
    }

    /// Removes an installed version other than the current one
    pub fn uninstall(&self, version: &str) -> Result<(), StoreError> {
        let version_dir = self.layout.version_dir(version)?;

        if self.current_version().as_deref() == Some(version) {
            return Err(StoreError::UninstallCurrent(version.to_string()));
        }

        if !version_dir.exists() {
            return Err(StoreError::NotInstalled(version.to_string()));
        }

        fs::remove_dir_all(&version_dir).map_err(StoreError::io(&version_dir))?;
        info!("Uninstalled version {}", version);
        Ok(())
    }

    /// Uninstalls every version except the current one, returning the removed names
    pub fn prune(&self) -> Result<Vec<String>, StoreError> {
        let current = self.current_version();
        debug!("Pruning all versions except {:?}", current);

        let mut removed = Vec::new();
        for version in self.installed_versions()? {
            if current.as_deref() == Some(version.as_str()) {
                continue;
            }
            self.uninstall(&version)?;
            removed.push(version);
        }

        Ok(removed)
    }

    /// Version the `current/bin` link resolves to, if any
    pub fn current_version(&self) -> Option<String> {
        let target = fs::canonicalize(self.layout.current_bin()).ok()?;
        let versions_dir = fs::canonicalize(self.layout.versions_dir()).ok()?;

        let relative = target.strip_prefix(&versions_dir).ok()?;
        let mut components = relative.components();
        let version = components.next()?.as_os_str().to_str()?.to_string();

        (components.as_path() == Path::new("go").join("bin")).then_some(version)
    }

    /// Names of the version directories.
    ///
    /// Stable versions come first in numeric order, then prereleases, then
    /// names that are not Go versions.
    pub fn installed_versions(&self) -> Result<Vec<String>, StoreError> {
        let versions_dir = self.layout.versions_dir();
        let entries = match fs::read_dir(&versions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&versions_dir)(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&versions_dir))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort_by_cached_key(|name| match Version::parse(name) {
            Some(v) if v.is_stable() => (0, Some(v), name.clone()),
            Some(v) => (1, Some(v), name.clone()),
            None => (2, None, name.clone()),
        });
        Ok(names)
    }

    fn create_dirs(&self, version_dir: &Path) -> Result<(), StoreError> {
        for dir in [
            self.layout.current_dir(),
            self.layout.downloads_dir(),
            version_dir.to_path_buf(),
        ] {
            fs::create_dir_all(&dir).map_err(StoreError::io(&dir))?;
        }
        Ok(())
    }

    fn download_and_extract(&self, version: &str, version_dir: &Path) -> Result<(), StoreError> {
        let archive_name = self.platform.archive_name(version);
        let url = archive_url(&self.registry_url, &archive_name);

        info!("Downloading {}", url);
        let bytes = self
            .fetcher
            .fetch(&url)
            .map_err(|source| StoreError::Fetch {
                version: version.to_string(),
                source,
            })?;

        let archive_path = self.layout.downloads_dir().join(&archive_name);
        fs::write(&archive_path, &bytes).map_err(StoreError::io(&archive_path))?;

        info!("Extracting {:?} to {:?}", archive_path, version_dir);
        self.extractor
            .extract(&archive_path, version_dir)
            .map_err(|source| StoreError::Extract {
                version: version.to_string(),
                source,
            })?;

        if !self.exists(version) {
            return Err(StoreError::MissingToolchain(version.to_string()));
        }

        Ok(())
    }

    fn clean_downloads(&self) {
        remove_dir_if_present(&self.layout.downloads_dir());
    }
}

fn remove_dir_if_present(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir)
        && e.kind() != ErrorKind::NotFound
    {
        warn!("Failed to remove {:?}: {}", dir, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::error::{ExtractError, FetchError};
    use crate::toolchain::extract::MockArchiveExtractor;
    use crate::toolchain::fetcher::MockArtifactFetcher;
    use tempfile::TempDir;

    /// Extractor that lays out a fake toolchain without reading the archive
    fn fake_extractor() -> MockArchiveExtractor {
        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_extract().returning(|archive, dest| {
            assert!(archive.is_file());
            fs::create_dir_all(dest.join("go/bin")).unwrap();
            Ok(())
        });
        extractor
    }

    fn ok_fetcher() -> MockArtifactFetcher {
        let mut fetcher = MockArtifactFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(b"archive".to_vec()));
        fetcher
    }

    fn store_with(
        dir: &TempDir,
        fetcher: MockArtifactFetcher,
        extractor: MockArchiveExtractor,
    ) -> ToolchainStore {
        ToolchainStore::new(
            Layout::new(&dir.path().join(".gobrew")),
            "https://go.dev/dl/",
            Platform::new("linux", "amd64"),
            Box::new(fetcher),
            Box::new(extractor),
        )
    }

    #[test]
    fn install_requests_platform_archive_and_cleans_downloads() {
        let dir = TempDir::new().unwrap();
        let mut fetcher = MockArtifactFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url == "https://go.dev/dl/go1.21.0.linux-amd64.tar.gz")
            .times(1)
            .returning(|_| Ok(b"archive".to_vec()));
        let store = store_with(&dir, fetcher, fake_extractor());

        assert_eq!(store.install("1.21.0").unwrap(), InstallOutcome::Installed);

        assert!(store.exists("1.21.0"));
        assert!(!store.layout().downloads_dir().exists());
    }

    #[test]
    fn install_skips_download_when_present() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        store.install("1.21.0").unwrap();

        let mut fetcher = MockArtifactFetcher::new();
        fetcher.expect_fetch().times(0);
        let store = store_with(&dir, fetcher, MockArchiveExtractor::new());

        assert_eq!(
            store.install("1.21.0").unwrap(),
            InstallOutcome::AlreadyInstalled
        );
    }

    #[test]
    fn failed_fetch_leaves_no_version_dir() {
        let dir = TempDir::new().unwrap();
        let mut fetcher = MockArtifactFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|url| Err(FetchError::NotFound(url.to_string())));
        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_extract().times(0);
        let store = store_with(&dir, fetcher, extractor);

        let result = store.install("9.9.9");

        assert!(matches!(result, Err(StoreError::Fetch { .. })));
        assert!(!store.exists("9.9.9"));
        assert!(!store.layout().version_dir("9.9.9").unwrap().exists());
        assert!(!store.layout().downloads_dir().exists());
    }

    #[test]
    fn failed_extract_removes_partial_version_dir() {
        let dir = TempDir::new().unwrap();
        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_extract().returning(|_, dest| {
            fs::create_dir_all(dest.join("go/src")).unwrap();
            Err(ExtractError::Io(std::io::Error::other("truncated")))
        });
        let store = store_with(&dir, ok_fetcher(), extractor);

        let result = store.install("1.21.0");

        assert!(matches!(result, Err(StoreError::Extract { .. })));
        assert!(!store.layout().version_dir("1.21.0").unwrap().exists());
    }

    #[test]
    fn archive_without_go_dir_is_not_an_install() {
        let dir = TempDir::new().unwrap();
        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_extract().returning(|_, _| Ok(()));
        let store = store_with(&dir, ok_fetcher(), extractor);

        let result = store.install("1.21.0");

        assert!(matches!(result, Err(StoreError::MissingToolchain(_))));
        assert!(!store.layout().version_dir("1.21.0").unwrap().exists());
    }

    #[test]
    fn install_rejects_path_like_versions_before_touching_disk() {
        let dir = TempDir::new().unwrap();
        let mut fetcher = MockArtifactFetcher::new();
        fetcher.expect_fetch().times(0);
        let store = store_with(&dir, fetcher, MockArchiveExtractor::new());

        assert!(matches!(
            store.install("../evil"),
            Err(StoreError::InvalidVersionName(_))
        ));
        assert!(!store.layout().install_dir().exists());
    }

    #[cfg(unix)]
    #[test]
    fn use_then_current_version_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        store.install("1.20").unwrap();
        store.install("1.21.0").unwrap();

        store.use_version("1.20").unwrap();
        assert_eq!(store.current_version().as_deref(), Some("1.20"));

        store.use_version("1.21.0").unwrap();
        assert_eq!(store.current_version().as_deref(), Some("1.21.0"));
        assert_eq!(
            fs::read_link(store.layout().current_go()).unwrap(),
            store.layout().toolchain_dir("1.21.0").unwrap()
        );
    }

    /// `path` spelled relative to the working directory
    #[cfg(unix)]
    fn relative_to_cwd(path: &Path) -> std::path::PathBuf {
        let cwd = std::env::current_dir().unwrap();
        let mut relative = std::path::PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.join(path.strip_prefix("/").unwrap())
    }

    #[cfg(unix)]
    #[test]
    fn use_with_relative_install_dir_links_resolvable_targets() {
        let dir = TempDir::new().unwrap();
        let relative = relative_to_cwd(&dir.path().join(".gobrew"));
        assert!(relative.is_relative());
        let store = ToolchainStore::new(
            Layout::new(&relative),
            "https://go.dev/dl/",
            Platform::new("linux", "amd64"),
            Box::new(ok_fetcher()),
            Box::new(fake_extractor()),
        );
        store.install("1.21.3").unwrap();

        store.use_version("1.21.3").unwrap();

        let target = fs::read_link(store.layout().current_bin()).unwrap();
        assert!(target.is_absolute());
        assert!(store.layout().current_bin().exists());
        assert_eq!(store.current_version().as_deref(), Some("1.21.3"));
        assert!(matches!(
            store.uninstall("1.21.3"),
            Err(StoreError::UninstallCurrent(_))
        ));
    }

    #[test]
    fn use_requires_installed_version() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());

        assert!(matches!(
            store.use_version("1.21.0"),
            Err(StoreError::NotInstalled(_))
        ));
        assert_eq!(store.current_version(), None);
    }

    #[cfg(unix)]
    #[test]
    fn current_version_is_none_for_broken_link() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        store.install("1.21.0").unwrap();
        store.use_version("1.21.0").unwrap();

        fs::remove_dir_all(store.layout().version_dir("1.21.0").unwrap()).unwrap();

        assert_eq!(store.current_version(), None);
    }

    #[cfg(unix)]
    #[test]
    fn uninstall_of_current_version_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        store.install("1.21.0").unwrap();
        store.use_version("1.21.0").unwrap();
        let link_before = fs::read_link(store.layout().current_bin()).unwrap();

        let result = store.uninstall("1.21.0");

        assert!(matches!(result, Err(StoreError::UninstallCurrent(_))));
        assert!(store.exists("1.21.0"));
        assert_eq!(
            fs::read_link(store.layout().current_bin()).unwrap(),
            link_before
        );
    }

    #[test]
    fn uninstall_removes_version_dir() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        store.install("1.21.0").unwrap();

        store.uninstall("1.21.0").unwrap();

        assert!(!store.exists("1.21.0"));
        assert!(matches!(
            store.uninstall("1.21.0"),
            Err(StoreError::NotInstalled(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn prune_keeps_only_current_version() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        for version in ["1.19", "1.20", "1.21.0", "1.22rc1"] {
            store.install(version).unwrap();
        }
        store.use_version("1.20").unwrap();

        let removed = store.prune().unwrap();

        assert_eq!(removed, vec!["1.19", "1.21.0", "1.22rc1"]);
        assert_eq!(store.installed_versions().unwrap(), vec!["1.20"]);
        assert_eq!(store.current_version().as_deref(), Some("1.20"));
    }

    #[test]
    fn installed_versions_orders_stable_then_prerelease() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        for version in ["1.22rc1", "1.9", "1.21.0", "1.10", "1.21rc2"] {
            store.install(version).unwrap();
        }
        fs::create_dir_all(store.layout().versions_dir().join("custom")).unwrap();
        fs::write(store.layout().versions_dir().join("stray.txt"), "").unwrap();

        assert_eq!(
            store.installed_versions().unwrap(),
            vec!["1.9", "1.10", "1.21.0", "1.21rc2", "1.22rc1", "custom"]
        );
    }

    #[test]
    fn installed_versions_is_empty_before_first_install() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, ok_fetcher(), fake_extractor());
        assert!(store.installed_versions().unwrap().is_empty());
    }
}
