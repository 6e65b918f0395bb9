use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch remote versions: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No version provided")]
    NoVersionProvided,

    #[error("Version group {0} not found in remote versions")]
    GroupNotFound(String),

    #[error("No go.mod found in {0}")]
    NoDescriptorFile(String),

    #[error("go.mod does not declare a go version")]
    NoDescriptorVersion,

    #[error("Remote version catalog is empty")]
    EmptyCatalog,

    #[error("Failed to read go.mod: {0}")]
    Descriptor(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
