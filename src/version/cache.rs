//! On-disk snapshot of the remote version list
//!
//! The snapshot is a small JSON document:
//!
//! ```json
//! {"timestamp": "2024-08-06T10:00:00Z", "versions": ["1.21.0", "1.21rc2"]}
//! ```
//!
//! A snapshot taken at `T0` is served for every access in `[T0, T0 + ttl)`.
//! Missing, unreadable or unparsable files are cache misses.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::version::error::CacheError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    timestamp: String,
    versions: Vec<String>,
}

/// Versions read back from a fresh snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVersions {
    pub fetched_at: DateTime<Utc>,
    pub versions: Vec<String>,
}

pub struct Cache {
    path: PathBuf,
    ttl: TimeDelta,
    disabled: bool,
}

impl Cache {
    pub fn new(path: &Path, ttl: TimeDelta, disabled: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            ttl,
            disabled,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the snapshot if caching is enabled and it is still fresh at `now`
    pub fn load(&self, now: DateTime<Utc>) -> Option<CachedVersions> {
        if self.disabled {
            return None;
        }

        let data = fs::read(&self.path).ok()?;
        let file: CacheFile = serde_json::from_slice(&data)
            .inspect_err(|e| debug!("Ignoring unparsable cache {:?}: {}", self.path, e))
            .ok()?;
        let fetched_at = DateTime::parse_from_rfc3339(&file.timestamp)
            .inspect_err(|e| debug!("Ignoring cache with bad timestamp: {}", e))
            .ok()?
            .with_timezone(&Utc);

        if self.is_expired(fetched_at, now) {
            debug!("Cache expired (fetched at {})", fetched_at);
            return None;
        }

        if file.versions.is_empty() {
            return None;
        }

        debug!(
            "Using {} cached versions from {}",
            file.versions.len(),
            fetched_at
        );
        Some(CachedVersions {
            fetched_at,
            versions: file.versions,
        })
    }

    /// Writes a snapshot of `versions` stamped with `now`. No-op when disabled.
    pub fn store(&self, now: DateTime<Utc>, versions: &[String]) -> Result<(), CacheError> {
        if self.disabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = CacheFile {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            versions: versions.to_vec(),
        };
        fs::write(&self.path, serde_json::to_vec(&file)?)?;

        debug!("Saved {} versions to {:?}", versions.len(), self.path);
        Ok(())
    }

    /// Deletes the snapshot. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared version cache {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn is_expired(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now >= fetched_at + self.ttl
    }
}
