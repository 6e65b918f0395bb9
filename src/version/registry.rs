//! Registry traits for fetching published Go versions

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for listing the release tags of the Go toolchain
#[cfg_attr(test, automock)]
pub trait TagSource {
    /// Fetches every release tag name (e.g. `go1.21.0`, `go1.22rc1`)
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names in the order the remote listed them
    /// * `Err(RegistryError)` - If the fetch fails
    fn fetch_tags(&self) -> Result<Vec<String>, RegistryError>;
}
