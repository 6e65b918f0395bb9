//! Remote version catalog and version expression resolution
//!
//! This module fetches the list of published Go releases, caches it on disk,
//! groups it by `major.minor` and resolves user-supplied expressions such as
//! `1.21@latest` or `mod` into concrete version names.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TagSource  │────▶│   Catalog   │◀────│  Resolver   │
//! │   (fetch)   │     │  (grouped)  │     │ (expr → v)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │    Cache    │
//! │  (GitHub)   │     │ (cache.json)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: JSON snapshot of the remote list with a time-to-live
//! - [`catalog`]: Version groups and the memoised catalog loader
//! - [`registry`]: Tag source trait for fetching published tags
//! - [`registries`]: Concrete tag sources and the release lookup
//! - [`resolver`]: Version expression resolution
//! - [`semver`]: Go version name parsing and ordering
//! - [`error`]: Error types for registry, catalog, cache and resolver operations

pub mod cache;
pub mod catalog;
pub mod error;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;
