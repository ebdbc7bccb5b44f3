//! Listing-Lens: commerce facts from retail product pages
//!
//! This crate extracts brand, sales rank, fulfillment responsibility and stock
//! from semi-structured product documents, and groups the product nodes of a
//! listing page into main-product/variation relationships.

pub mod config;
pub mod document;
pub mod extract;
pub mod facts;
pub mod identifier;
pub mod listing;
pub mod output;
pub mod provider;

use thiserror::Error;

/// Main error type for Listing-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Document retrieval errors
///
/// This is the only hard error produced while assembling a listing record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to build detail URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("No document available for {0}")]
    Missing(String),
}

/// Identifier-specific errors
#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("Identifier must be 8-10 characters, got {0}")]
    Length(usize),

    #[error("Identifier must be alphanumeric: {0}")]
    Charset(String),
}

/// Result type alias for Listing-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for document retrieval
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use document::ProductDocument;
pub use facts::{ListingFactsAssembler, ListingRecord};
pub use identifier::ProductIdentifier;
pub use listing::{group_listing, NodeKind, ProductGroup};
pub use provider::{DocumentProvider, HttpDocumentProvider, MemoryDocumentProvider};
