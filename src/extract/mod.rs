//! Commerce-fact extractors over a [`ProductDocument`](crate::ProductDocument)
//!
//! Every extractor is synchronous, never fails and falls back to a documented
//! default when the page does not carry the fact.

pub mod brand;
pub mod chain;
pub mod dispatch;
pub mod fulfillment;
pub mod offer;
pub mod rank;
pub mod stock;

pub use brand::extract_brand;
pub use chain::{first_success, first_success_named, Strategy};
pub use dispatch::{classify_dispatch, count_mentions, DispatchTally, DispatchType};
pub use fulfillment::{classify_fulfillment, FulfillmentBreakdown};
pub use offer::{read_offer, Condition, SellerOffer};
pub use rank::{extract_rank, RankFact};
pub use stock::{aggregate_stock, StockMethod, StockSummary};
