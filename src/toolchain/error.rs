use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Archive not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to unpack archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to unpack zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Unsupported archive format: {0:?}")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Version {0} is not installed")]
    NotInstalled(String),

    #[error(
        "Version {0} is the current version; switch to a different version before uninstalling it"
    )]
    UninstallCurrent(String),

    #[error("Invalid version name '{0}'")]
    InvalidVersionName(String),

    #[error("Failed to download version {version}: {source}")]
    Fetch {
        version: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to extract version {version}: {source}")]
    Extract {
        version: String,
        #[source]
        source: ExtractError,
    },

    #[error("Archive for version {0} does not contain a Go toolchain")]
    MissingToolchain(String),

    #[error("Filesystem error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }
}
