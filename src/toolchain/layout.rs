//! On-disk layout of the install directory
//!
//! ```text
//! <install>/
//! ├── versions/<version>/go/...   one unpacked toolchain per version
//! ├── current/bin -> versions/<version>/go/bin
//! ├── current/go  -> versions/<version>/go
//! └── downloads/                  scratch space, removed after each install
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::toolchain::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    install_dir: PathBuf,
}

impl Layout {
    /// Layout rooted at `install_dir`, made absolute against the working directory.
    ///
    /// Link targets are written from these paths and a relative target would
    /// resolve against the link's own directory.
    pub fn new(install_dir: &Path) -> Self {
        let install_dir = std::path::absolute(install_dir).unwrap_or_else(|e| {
            warn!("Cannot make {:?} absolute: {}", install_dir, e);
            install_dir.to_path_buf()
        });
        Self { install_dir }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.install_dir.join("versions")
    }

    pub fn current_dir(&self) -> PathBuf {
        self.install_dir.join("current")
    }

    pub fn current_bin(&self) -> PathBuf {
        self.current_dir().join("bin")
    }

    pub fn current_go(&self) -> PathBuf {
        self.current_dir().join("go")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.install_dir.join("downloads")
    }

    /// `versions/<version>`, rejecting names that are not a single path component
    pub fn version_dir(&self, version: &str) -> Result<PathBuf, StoreError> {
        let mut components = Path::new(version).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.versions_dir().join(version)),
            _ => Err(StoreError::InvalidVersionName(version.to_string())),
        }
    }

    /// `versions/<version>/go`
    pub fn toolchain_dir(&self, version: &str) -> Result<PathBuf, StoreError> {
        Ok(self.version_dir(version)?.join("go"))
    }

    /// `versions/<version>/go/bin`
    pub fn toolchain_bin_dir(&self, version: &str) -> Result<PathBuf, StoreError> {
        Ok(self.toolchain_dir(version)?.join("bin"))
    }
}
