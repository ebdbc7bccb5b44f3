//! In-memory document provider for saved pages

use crate::document::ProductDocument;
use crate::identifier::ProductIdentifier;
use crate::provider::DocumentProvider;
use crate::FetchError;
use std::collections::HashMap;

/// Serves documents from saved HTML, keyed by identifier
#[derive(Debug, Default, Clone)]
pub struct MemoryDocumentProvider {
    pages: HashMap<ProductIdentifier, String>,
}

impl MemoryDocumentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the page for `asin`
    pub fn insert(&mut self, asin: ProductIdentifier, html: impl Into<String>) {
        self.pages.insert(asin, html.into());
    }

    pub fn with_page(mut self, asin: ProductIdentifier, html: impl Into<String>) -> Self {
        self.insert(asin, html);
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl DocumentProvider for MemoryDocumentProvider {
    async fn get_document(&self, asin: &ProductIdentifier) -> Result<ProductDocument, FetchError> {
        self.pages
            .get(asin)
            .map(|html| ProductDocument::parse(html))
            .ok_or_else(|| FetchError::Missing(asin.to_string()))
    }
}
