use crate::config::FetcherConfig;
use crate::document::ProductDocument;
use crate::extract::{aggregate_stock, classify_fulfillment, extract_brand, extract_rank};
use crate::facts::ListingRecord;
use crate::identifier::ProductIdentifier;
use crate::provider::DocumentProvider;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Runs every extractor over one detail document
///
/// Pure: the same document always yields the same record.
pub fn assemble(asin: &ProductIdentifier, doc: &ProductDocument) -> ListingRecord {
    ListingRecord {
        asin: asin.clone(),
        brand: extract_brand(doc),
        rank_text: extract_rank(doc).map(|rank| rank.rank_text),
        fulfillment_breakdown: classify_fulfillment(doc),
        stock: aggregate_stock(doc, asin),
    }
}

/// Produces listing records from a document provider
pub struct ListingFactsAssembler<P> {
    provider: P,
    max_concurrent: usize,
}

impl<P: DocumentProvider> ListingFactsAssembler<P> {
    /// Creates an assembler that fetches one document at a time
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_concurrent: 1,
        }
    }

    /// Creates an assembler bounded by the configured request concurrency
    pub fn from_config(provider: P, config: &FetcherConfig) -> Self {
        Self::new(provider).with_concurrency(config.max_concurrent_requests)
    }

    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches and assembles the record for one identifier
    ///
    /// # Returns
    ///
    /// * `Some(ListingRecord)` - The document was obtained
    /// * `None` - The provider failed; the failure is logged
    pub async fn fetch(&self, asin: &ProductIdentifier) -> Option<ListingRecord> {
        match self.provider.get_document(asin).await {
            Ok(doc) => {
                let record = assemble(asin, &doc);
                debug!(
                    %asin,
                    brand = %record.brand,
                    stock = record.stock.total,
                    "listing record assembled"
                );
                Some(record)
            }
            Err(e) => {
                warn!(%asin, error = %e, "failed to fetch detail document");
                None
            }
        }
    }

    /// Fetches several identifiers concurrently, keeping input order
    ///
    /// Repeated identifiers are fetched once per occurrence.
    pub async fn fetch_many(&self, asins: &[ProductIdentifier]) -> Vec<Option<ListingRecord>> {
        info!(
            count = asins.len(),
            concurrency = self.max_concurrent,
            "fetching listing records"
        );
        stream::iter(asins)
            .map(|asin| self.fetch(asin))
            .buffered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await
    }
}
