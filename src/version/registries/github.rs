//! GitHub-hosted registry implementations
//!
//! - [`GitHubTagsRegistry`]: the mirrored list of Go release tags
//! - [`GitHubReleases`]: gobrew's own latest release, for the self-update check

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TOOLCHAIN_PREFIX;
use crate::version::error::RegistryError;
use crate::version::registry::TagSource;

/// Default URL of the mirrored Go tags listing
pub const DEFAULT_TAGS_URL: &str =
    "https://raw.githubusercontent.com/kevincobain2000/gobrew/json/golang-tags.json";

/// Default URL of gobrew's latest release metadata
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/kevincobain2000/gobrew/releases/latest";

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Entry of the git tags listing
#[derive(Debug, Deserialize)]
struct TagRef {
    #[serde(rename = "ref")]
    reference: String,
}

/// Response from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Maps rate limiting and unexpected statuses onto [`RegistryError`]
fn check_status(response: Response, url: &str) -> Result<Response, RegistryError> {
    let status = response.status();

    // GitHub answers 403 instead of 429 once the anonymous quota is used up
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status == reqwest::StatusCode::FORBIDDEN
    {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("GitHub returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

/// Registry implementation for the Go release tags listing
pub struct GitHubTagsRegistry {
    client: Client,
    url: String,
}

impl GitHubTagsRegistry {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl TagSource for GitHubTagsRegistry {
    fn fetch_tags(&self) -> Result<Vec<String>, RegistryError> {
        debug!("Fetching Go tags from {}", self.url);
        let response = self.client.get(&self.url).send()?;
        let response = check_status(response, &self.url)?;

        let refs: Vec<TagRef> = response.json().map_err(|e| {
            warn!("Failed to parse tags response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let tags = refs
            .into_iter()
            .filter_map(|r| {
                let tag = r
                    .reference
                    .strip_prefix(TAG_REF_PREFIX)
                    .unwrap_or(&r.reference);
                tag.starts_with(TOOLCHAIN_PREFIX).then(|| tag.to_string())
            })
            .collect();

        Ok(tags)
    }
}

/// Client for gobrew's own release metadata
pub struct GitHubReleases {
    client: Client,
    url: String,
}

impl GitHubReleases {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Tag name of the latest published release (e.g. `v1.10.11`)
    pub fn latest_tag(&self) -> Result<String, RegistryError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/vnd.github+json")
            .send()?;
        let response = check_status(response, &self.url)?;

        let release: Release = response.json().map_err(|e| {
            warn!("Failed to parse release response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(release.tag_name)
    }
}
