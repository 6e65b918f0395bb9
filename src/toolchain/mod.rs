//! Local toolchain management
//!
//! Downloads release archives, unpacks them under the install directory and
//! maintains the `current` links that select the active toolchain.
//!
//! # Modules
//!
//! - [`store`]: Install, use, uninstall and prune operations
//! - [`layout`]: Paths inside the install directory
//! - [`platform`]: Host OS/arch naming and archive names
//! - [`fetcher`]: Archive download trait and HTTP implementation
//! - [`extract`]: Archive extraction trait and `.tar.gz` implementation
//! - [`link`]: Directory symlink replacement
//! - [`error`]: Error types for download, extraction and store operations

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod layout;
pub mod link;
pub mod platform;
pub mod store;

pub use layout::Layout;
pub use platform::Platform;
pub use store::{InstallOutcome, ToolchainStore};
