use crate::extract::{FulfillmentBreakdown, StockSummary};
use crate::identifier::ProductIdentifier;
use serde::Serialize;

/// Every commerce fact extracted for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub asin: ProductIdentifier,
    /// Empty when the page names no brand
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_text: Option<String>,
    pub fulfillment_breakdown: FulfillmentBreakdown,
    pub stock: StockSummary,
}
