//! Error types for apidoc-index

use std::path::PathBuf;
use thiserror::Error;

/// Failures while retrieving, parsing or dereferencing a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Local file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid JSON
    #[error("Invalid JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON is well-formed but not a structurally valid OpenAPI document
    #[error("Invalid OpenAPI document: {0}")]
    InvalidDocument(String),

    /// Document declares a version the index does not understand
    #[error("Unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    /// A `$ref` target does not exist
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Expanding references would produce more nodes than allowed
    #[error("Reference expansion exceeds {0} nodes")]
    ExpansionLimit(usize),

    /// Source string or reference location cannot be turned into a location
    #[error("Invalid source location: {0}")]
    InvalidLocation(String),
}

/// Errors surfaced by the index and its queries.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Loading a document failed; no snapshot was installed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A query ran before any successful load
    #[error("OpenAPI spec not loaded")]
    NotLoaded,

    /// Named group does not exist in the current snapshot
    #[error("Group {0} not found")]
    GroupNotFound(String),
}

impl IndexError {
    /// Returns true if the error came from the loader.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load(_))
    }
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
