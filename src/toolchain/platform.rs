//! Go's names for the host platform and release archives

use crate::config::TOOLCHAIN_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// The platform this binary was built for, in Go's `GOOS`/`GOARCH` terms
    pub fn current() -> Self {
        Self::new(
            go_os(std::env::consts::OS),
            go_arch(std::env::consts::ARCH),
        )
    }

    /// `<os>-<arch>`, e.g. `linux-amd64`
    pub fn id(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    pub fn archive_ext(&self) -> &'static str {
        if self.os == "windows" {
            ".zip"
        } else {
            ".tar.gz"
        }
    }

    /// `go<version>.<os>-<arch><ext>`
    pub fn archive_name(&self, version: &str) -> String {
        format!(
            "{}{}.{}{}",
            TOOLCHAIN_PREFIX,
            version,
            self.id(),
            self.archive_ext()
        )
    }
}

fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn go_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "armv6l",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Joins the registry base URL and an archive name
pub fn archive_url(registry_url: &str, archive_name: &str) -> String {
    format!("{}/{}", registry_url.trim_end_matches('/'), archive_name)
}
