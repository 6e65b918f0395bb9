//! go.mod reader
//!
//! Only the `go` directive matters here: the first line of the form
//! `go 1.21` or `go 1.21.3` declares the toolchain version a project expects.
//! The file is read directly rather than through `go list`, since Go itself
//! may not be installed yet.

use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project descriptor looked up in the working directory
pub const GO_MOD_FILE: &str = "go.mod";

const GO_DIRECTIVE: &str = "go ";

/// The go.mod of one project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoMod {
    path: PathBuf,
}

impl GoMod {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(GO_MOD_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the declared go version.
    ///
    /// A missing file surfaces as an `io::ErrorKind::NotFound` error; a file
    /// without a `go` directive yields `Ok(None)`.
    pub fn declared_version(&self) -> std::io::Result<Option<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(parse_go_directive(&content))
    }
}

/// Extracts the version of the first `go` directive
pub fn parse_go_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix(GO_DIRECTIVE)?;
        // Drop a trailing `// comment`
        let value = rest.split("//").next().unwrap_or(rest).trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
