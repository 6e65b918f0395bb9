mod helper;

use std::fs;

use tempfile::TempDir;

use gobrew::toolchain::InstallOutcome;
use gobrew::toolchain::error::StoreError;

use helper::{ArchiveFetcher, FailingFetcher, create_test_store};

#[test]
fn install_unpacks_release_archive() {
    let dir = TempDir::new().unwrap();
    let fetcher = ArchiveFetcher::new();
    let requests = fetcher.requests();
    let store = create_test_store(dir.path(), fetcher);

    assert_eq!(store.install("1.21.3").unwrap(), InstallOutcome::Installed);

    assert!(store.exists("1.21.3"));
    let toolchain = store.layout().toolchain_dir("1.21.3").unwrap();
    assert_eq!(
        fs::read_to_string(toolchain.join("VERSION")).unwrap(),
        "1.21.3"
    );
    assert_eq!(
        *requests.borrow(),
        vec!["https://go.test/dl/go1.21.3.linux-amd64.tar.gz"]
    );
    assert!(!store.layout().downloads_dir().exists());
}

#[test]
fn second_install_does_not_download() {
    let dir = TempDir::new().unwrap();
    let fetcher = ArchiveFetcher::new();
    let requests = fetcher.requests();
    let store = create_test_store(dir.path(), fetcher);

    store.install("1.21.3").unwrap();
    let outcome = store.install("1.21.3").unwrap();

    assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
    assert_eq!(requests.borrow().len(), 1);
}

#[test]
fn failed_install_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(dir.path(), FailingFetcher);

    let result = store.install("9.9.9");

    assert!(matches!(result, Err(StoreError::Fetch { .. })));
    assert!(!store.exists("9.9.9"));
    assert!(store.installed_versions().unwrap().is_empty());
    assert!(!store.layout().downloads_dir().exists());
}

#[cfg(unix)]
#[test]
fn use_points_current_links_at_version() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(dir.path(), ArchiveFetcher::new());
    store.install("1.20.5").unwrap();
    store.install("1.21.3").unwrap();

    store.use_version("1.20.5").unwrap();
    store.use_version("1.21.3").unwrap();

    assert_eq!(store.current_version().as_deref(), Some("1.21.3"));
    assert!(store.layout().current_bin().join("go").is_file());
    assert_eq!(
        fs::read_to_string(store.layout().current_go().join("VERSION")).unwrap(),
        "1.21.3"
    );
}

#[cfg(unix)]
#[test]
fn uninstall_current_fails_without_mutation() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(dir.path(), ArchiveFetcher::new());
    store.install("1.21.3").unwrap();
    store.use_version("1.21.3").unwrap();

    let result = store.uninstall("1.21.3");

    assert!(matches!(result, Err(StoreError::UninstallCurrent(v)) if v == "1.21.3"));
    assert!(store.exists("1.21.3"));
    assert_eq!(store.current_version().as_deref(), Some("1.21.3"));
}

#[cfg(unix)]
#[test]
fn prune_leaves_only_current() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(dir.path(), ArchiveFetcher::new());
    for version in ["1.19", "1.20.5", "1.21.3"] {
        store.install(version).unwrap();
    }
    store.use_version("1.20.5").unwrap();

    let removed = store.prune().unwrap();

    assert_eq!(removed, vec!["1.19", "1.21.3"]);
    assert_eq!(store.installed_versions().unwrap(), vec!["1.20.5"]);
    assert_eq!(store.current_version().as_deref(), Some("1.20.5"));
}

#[test]
fn prune_without_current_removes_everything() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(dir.path(), ArchiveFetcher::new());
    store.install("1.20.5").unwrap();
    store.install("1.21.3").unwrap();

    let removed = store.prune().unwrap();

    assert_eq!(removed, vec!["1.20.5", "1.21.3"]);
    assert!(store.installed_versions().unwrap().is_empty());
}
