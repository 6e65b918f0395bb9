//! Tag source test utilities

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use chrono::TimeDelta;

use gobrew::version::cache::Cache;
use gobrew::version::catalog::VersionCatalog;
use gobrew::version::error::RegistryError;
use gobrew::version::registry::TagSource;

/// Tag source serving a fixed list of `go`-prefixed tags
pub struct FakeTagSource {
    tags: Vec<String>,
    calls: Rc<Cell<usize>>,
}

impl FakeTagSource {
    pub fn new(versions: &[&str]) -> Self {
        Self {
            tags: versions.iter().map(|v| format!("go{}", v)).collect(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Shared counter of `fetch_tags` calls, readable after the source is boxed
    pub fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl TagSource for FakeTagSource {
    fn fetch_tags(&self) -> Result<Vec<String>, RegistryError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.tags.clone())
    }
}

/// Create a catalog over `source` whose cache lives in `dir`
pub fn create_test_catalog(dir: &Path, source: FakeTagSource, ttl: TimeDelta) -> VersionCatalog {
    VersionCatalog::new(
        Box::new(source),
        Cache::new(&dir.join("cache.json"), ttl, false),
    )
}
