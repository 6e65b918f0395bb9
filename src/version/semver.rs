//! Go toolchain version parsing
//!
//! Go release names are not semver: the trailing `.0` was omitted before
//! 1.21 and prereleases are glued to the minor (or patch) component:
//! - `1.18`, `1.18.3`, `1.21.0`
//! - `1.21rc2`, `1.18beta1`, `1.9.2rc2`
//!
//! Every name is parsed once into [`Version`] and compared through
//! [`Version::to_semver`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Minor version from which Go started publishing `X.Y.0` instead of `X.Y`.
pub const PATCH_ZERO_THRESHOLD: u64 = 21;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:(beta|rc)(\d+))?$").expect("valid version regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrereleaseKind {
    Beta,
    Rc,
}

impl PrereleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrereleaseKind::Beta => "beta",
            PrereleaseKind::Rc => "rc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Release {
    Stable {
        major: u64,
        minor: u64,
        patch: Option<u64>,
    },
    Prerelease {
        major: u64,
        minor: u64,
        patch: Option<u64>,
        kind: PrereleaseKind,
        number: u64,
    },
}

/// A published Go version: the name as it appears in release tags plus its
/// parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    release: Release,
}

impl Version {
    /// Parse a version name without the `go` prefix.
    ///
    /// Returns `None` for anything that is not `X.Y[.Z][(beta|rc)N]`.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(raw)?;
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());

        let major = number(1)?;
        let minor = number(2)?;
        let patch = match caps.get(3) {
            Some(_) => Some(number(3)?),
            None => None,
        };

        let release = match caps.get(4).map(|m| m.as_str()) {
            Some(kind) => Release::Prerelease {
                major,
                minor,
                patch,
                kind: if kind == "beta" {
                    PrereleaseKind::Beta
                } else {
                    PrereleaseKind::Rc
                },
                number: number(5)?,
            },
            None => Release::Stable {
                major,
                minor,
                patch,
            },
        };

        Some(Self {
            raw: raw.to_string(),
            release,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn release(&self) -> Release {
        self.release
    }

    pub fn major(&self) -> u64 {
        match self.release {
            Release::Stable { major, .. } | Release::Prerelease { major, .. } => major,
        }
    }

    pub fn minor(&self) -> u64 {
        match self.release {
            Release::Stable { minor, .. } | Release::Prerelease { minor, .. } => minor,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self.release, Release::Stable { .. })
    }

    /// The `major.minor` group this version belongs to.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            major: self.major(),
            minor: self.minor(),
        }
    }

    /// Canonical spelling for a concrete version.
    ///
    /// `X.Y.0` collapses to `X.Y` below [`PATCH_ZERO_THRESHOLD`], matching
    /// the names Go published at the time.
    pub fn canonical(&self) -> String {
        match self.release {
            Release::Stable {
                major,
                minor,
                patch: Some(0),
            } if minor < PATCH_ZERO_THRESHOLD => format!("{}.{}", major, minor),
            _ => self.raw.clone(),
        }
    }

    /// Numeric projection used for ordering.
    ///
    /// `1.21rc2` becomes `1.21.0-rc.2`, which sorts before `1.21.0`.
    pub fn to_semver(&self) -> semver::Version {
        match self.release {
            Release::Stable {
                major,
                minor,
                patch,
            } => semver::Version::new(major, minor, patch.unwrap_or(0)),
            Release::Prerelease {
                major,
                minor,
                patch,
                kind,
                number,
            } => {
                let mut version = semver::Version::new(major, minor, patch.unwrap_or(0));
                version.pre = semver::Prerelease::new(&format!("{}.{}", kind.as_str(), number))
                    .unwrap_or(semver::Prerelease::EMPTY);
                version
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver()
            .cmp(&other.to_semver())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

/// `major.minor` key of a version group, ordered numerically (`1.9 < 1.10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub major: u64,
    pub minor: u64,
}

impl GroupKey {
    /// Parse a bare `X.Y`.
    pub fn parse(key: &str) -> Option<Self> {
        let (major, minor) = key.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    /// Group of a bare `X.Y` or of any concrete version name
    pub fn of(name: &str) -> Option<Self> {
        Self::parse(name).or_else(|| Version::parse(name).map(|v| v.group_key()))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
