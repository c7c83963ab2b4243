#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} fetching {path}")]
    Http { status: u16, path: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Type {facet} could not be fetched: {message}")]
    Aggregate { facet: u32, message: String },
}

/// Result of a fetch that may be shared between deduplicated callers
pub type FetchResult<T> = std::result::Result<T, Error>;
