use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

use crate::version::registries::github::{DEFAULT_RELEASES_URL, DEFAULT_TAGS_URL};

// =============================================================================
// Constants
// =============================================================================

/// Prefix of Go release tags and archive names (`go1.21.0`)
pub const TOOLCHAIN_PREFIX: &str = "go";

/// Sentinel printed and accepted wherever no version applies
pub const NONE_VERSION: &str = "None";

/// Name of the install directory created under the root
pub const INSTALL_DIR_NAME: &str = ".gobrew";

/// Default location of the Go release archives
pub const DEFAULT_REGISTRY_URL: &str = "https://go.dev/dl/";

/// Default lifetime of the remote versions snapshot in seconds (20 minutes)
pub const DEFAULT_CACHE_TTL_SECS: i64 = 20 * 60;

/// Timeout for HTTP requests in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Optional settings file (`<install dir>/config.json`)
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub registry_url: Option<String>,
    pub tags_url: Option<String>,
    pub releases_url: Option<String>,
    pub cache: CacheSettings,
}

/// Cache-related settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheSettings {
    /// Snapshot lifetime in seconds
    pub ttl_seconds: Option<i64>,
    pub disabled: bool,
}

impl Settings {
    /// Reads the settings file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line or through `GOBREW_*` variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub registry_url: Option<String>,
    pub ttl_seconds: Option<i64>,
    pub disable_cache: bool,
    pub clear_cache: bool,
}

/// Resolved configuration, built once per invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub install_dir: PathBuf,
    pub registry_url: String,
    pub tags_url: String,
    pub releases_url: String,
    pub cache_ttl: TimeDelta,
    pub disable_cache: bool,
    pub clear_cache: bool,
}

impl Config {
    /// Defaults for an install directory under `root`
    pub fn with_root(root: &Path) -> Self {
        Self {
            install_dir: root.join(INSTALL_DIR_NAME),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            tags_url: DEFAULT_TAGS_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            cache_ttl: TimeDelta::seconds(DEFAULT_CACHE_TTL_SECS),
            disable_cache: false,
            clear_cache: false,
        }
    }

    /// Layers defaults, the settings file and `overrides`, in that order
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        let root = root_dir_with_env(overrides.root.clone(), dirs::home_dir());
        let mut config = Self::with_root(&root);
        config.apply_settings(Settings::load(&config.settings_path())?);
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        if let Some(url) = settings.registry_url {
            self.registry_url = url;
        }
        if let Some(url) = settings.tags_url {
            self.tags_url = url;
        }
        if let Some(url) = settings.releases_url {
            self.releases_url = url;
        }
        if let Some(secs) = settings.cache.ttl_seconds {
            self.cache_ttl = TimeDelta::seconds(secs);
        }
        self.disable_cache |= settings.cache.disabled;
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.registry_url.filter(|u| !u.is_empty()) {
            self.registry_url = url;
        }
        if let Some(secs) = overrides.ttl_seconds {
            self.cache_ttl = TimeDelta::seconds(secs);
        }
        self.disable_cache |= overrides.disable_cache;
        self.clear_cache |= overrides.clear_cache;
    }

    /// Returns the path to the remote versions snapshot.
    pub fn cache_path(&self) -> PathBuf {
        self.install_dir.join("cache.json")
    }

    /// Returns the path to the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.install_dir.join("config.json")
    }

    /// Returns the path to the log file.
    pub fn log_path(&self) -> PathBuf {
        self.install_dir.join("gobrew.log")
    }
}

/// Root under which `.gobrew` lives.
/// Uses GOBREW_ROOT if set, otherwise the home directory,
/// or the current directory if neither is available.
fn root_dir_with_env(gobrew_root: Option<PathBuf>, home_dir: Option<PathBuf>) -> PathBuf {
    gobrew_root
        .filter(|p| !p.as_os_str().is_empty())
        .or(home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
