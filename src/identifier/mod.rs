//! Product identifier handling for Listing-Lens
//!
//! This module validates ASIN-style identifiers, extracts them from listing
//! attributes and URL paths, and builds detail-page URLs.

mod path;

use crate::IdentifierError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub use path::{detail_url, from_href, from_url_path};

/// Shortest accepted identifier length
pub const MIN_LEN: usize = 8;

/// Longest accepted identifier length
pub const MAX_LEN: usize = 10;

/// An uppercase, 8-10 character alphanumeric product code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductIdentifier(String);

impl ProductIdentifier {
    /// Parses an identifier, upper-casing it
    ///
    /// Surrounding whitespace is ignored; anything else outside `[A-Za-z0-9]`
    /// is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_lens::identifier::ProductIdentifier;
    ///
    /// let asin = ProductIdentifier::parse(" b07xyz1234 ").unwrap();
    /// assert_eq!(asin.as_str(), "B07XYZ1234");
    /// assert!(ProductIdentifier::parse("B07-XYZ").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();

        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(IdentifierError::Length(len));
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::Charset(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Reads an identifier from an explicit attribute value, if it is valid
    pub fn from_attribute(value: &str) -> Option<Self> {
        Self::parse(value).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
