//! Configuration module for Listing-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use listing_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lens.toml")).unwrap();
//! println!("Marketplace: {}", config.marketplace.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, GroupingConfig, MarketplaceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
