//! Registry implementations for fetching Go versions

pub mod github;

pub use github::{GitHubReleases, GitHubTagsRegistry};

use std::time::Duration;

use crate::config::FETCH_TIMEOUT_MS;

/// Builds the blocking HTTP client shared by registries and the archive fetcher
pub fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent("gobrew")
        .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
        .build()
}
