//! Toolchain store test utilities

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use chrono::TimeDelta;
use flate2::Compression;
use flate2::write::GzEncoder;

use gobrew::app::Gobrew;
use gobrew::parser::GoMod;
use gobrew::toolchain::error::FetchError;
use gobrew::toolchain::extract::ReleaseExtractor;
use gobrew::toolchain::fetcher::ArtifactFetcher;
use gobrew::toolchain::{Layout, Platform, ToolchainStore};
use gobrew::version::registries::{GitHubReleases, http_client};

use super::registry::{FakeTagSource, create_test_catalog};

pub const TEST_REGISTRY_URL: &str = "https://go.test/dl/";

/// Build a `.tar.gz` laid out like a Go release archive
pub fn release_archive(version: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::fast()));
    let files: [(&str, &[u8], u32); 2] = [
        ("go/bin/go", b"#!/bin/sh\necho go\n", 0o755),
        ("go/VERSION", version.as_bytes(), 0o644),
    ];
    for (name, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, name, content).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Fetcher serving a release archive for whatever version the URL names
#[derive(Default)]
pub struct ArchiveFetcher {
    requests: Rc<RefCell<Vec<String>>>,
}

impl ArchiveFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared log of requested URLs
    pub fn requests(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.requests)
    }
}

impl ArtifactFetcher for ArchiveFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        let version = url
            .rsplit('/')
            .next()
            .and_then(|name| name.strip_prefix("go"))
            .and_then(|name| name.split(".linux").next())
            .unwrap_or_default();
        Ok(release_archive(version))
    }
}

/// Fetcher for which every archive is missing
pub struct FailingFetcher;

impl ArtifactFetcher for FailingFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::NotFound(url.to_string()))
    }
}

/// Create a store rooted at `dir/.gobrew` with the real `.tar.gz` extractor
pub fn create_test_store(dir: &Path, fetcher: impl ArtifactFetcher + 'static) -> ToolchainStore {
    ToolchainStore::new(
        Layout::new(&dir.join(".gobrew")),
        TEST_REGISTRY_URL,
        Platform::new("linux", "amd64"),
        Box::new(fetcher),
        Box::new(ReleaseExtractor),
    )
}

/// Create an app over fake remote versions, reading go.mod from `dir`
pub fn create_test_app(
    dir: &Path,
    versions: &[&str],
    fetcher: impl ArtifactFetcher + 'static,
) -> Gobrew {
    Gobrew::new(
        create_test_catalog(dir, FakeTagSource::new(versions), TimeDelta::minutes(20)),
        create_test_store(dir, fetcher),
        GoMod::in_dir(dir),
        GitHubReleases::new(http_client().unwrap(), "http://127.0.0.1:9/releases"),
    )
}
