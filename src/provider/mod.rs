//! Document providers
//!
//! A [`DocumentProvider`] turns a product identifier into a parsed detail
//! page. [`HttpDocumentProvider`] fetches from the configured marketplace and
//! reuses the page already in hand; [`MemoryDocumentProvider`] serves saved
//! pages.

mod http;
mod memory;

pub use http::{build_http_client, HttpDocumentProvider};
pub use memory::MemoryDocumentProvider;

use crate::document::ProductDocument;
use crate::identifier::ProductIdentifier;
use crate::FetchError;
use std::future::Future;

/// Source of product detail documents
///
/// Implementations are polled on the caller's task; the returned future is
/// not required to be `Send`.
pub trait DocumentProvider {
    /// Produces the detail document for `asin`
    fn get_document(
        &self,
        asin: &ProductIdentifier,
    ) -> impl Future<Output = Result<ProductDocument, FetchError>>;
}
