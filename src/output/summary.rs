//! Text summaries of listing records
//!
//! Each field is formatted the way the listing card shows it, with
//! [`PLACEHOLDER`] standing in for missing values.

use crate::extract::{FulfillmentBreakdown, StockSummary};
use crate::facts::ListingRecord;
use crate::listing::{NodeKind, ProductGroup};
use url::Url;

/// Shown for a field with no value
pub const PLACEHOLDER: &str = "—";

/// Formats the rank text, or the placeholder when there is none
pub fn format_rank(rank_text: Option<&str>) -> String {
    rank_text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Formats a breakdown as `Prime N+ / FBA N+ / FBM N+`
///
/// # Example
///
/// ```
/// use listing_lens::extract::FulfillmentBreakdown;
/// use listing_lens::output::format_fulfillment;
///
/// let breakdown = FulfillmentBreakdown { amz: 1, prime: 1, fba: 2, fbm: 0 };
/// assert_eq!(format_fulfillment(&breakdown), "Prime 1+ / FBA 2+ / FBM 0+");
/// ```
pub fn format_fulfillment(breakdown: &FulfillmentBreakdown) -> String {
    format!(
        "Prime {}+ / FBA {}+ / FBM {}+",
        breakdown.prime, breakdown.fba, breakdown.fbm
    )
}

/// Formats stock as its raw text, else its total, else the placeholder
pub fn format_stock(stock: &StockSummary) -> String {
    let raw = stock.raw_text.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }
    if stock.total > 0 {
        return stock.total.to_string();
    }
    PLACEHOLDER.to_string()
}

pub fn format_brand(brand: &str) -> String {
    match brand.trim() {
        "" => PLACEHOLDER.to_string(),
        brand => brand.to_string(),
    }
}

/// Formats a record as one labelled line per field
///
/// # Arguments
///
/// * `record` - The listing record
/// * `details_url` - Detail-page link shown on the last line, if known
pub fn format_record(record: &ListingRecord, details_url: Option<&Url>) -> String {
    let mut text = String::new();
    text.push_str(&format!("{:<12} {}\n", "ASIN", record.asin));
    text.push_str(&format!(
        "{:<12} {}\n",
        "Rank",
        format_rank(record.rank_text.as_deref())
    ));
    text.push_str(&format!(
        "{:<12} {}\n",
        "Fulfillment",
        format_fulfillment(&record.fulfillment_breakdown)
    ));
    text.push_str(&format!("{:<12} {}\n", "Stock", format_stock(&record.stock)));
    text.push_str(&format!("{:<12} {}\n", "Brand", format_brand(&record.brand)));
    if let Some(url) = details_url {
        text.push_str(&format!("{:<12} {}\n", "Details", url));
    }
    text
}

/// The placeholder record shown when no data could be fetched
pub fn format_unavailable(asin: &str) -> String {
    let mut text = format!("{:<12} {}\n", "ASIN", asin);
    for label in ["Rank", "Fulfillment", "Stock", "Brand"] {
        text.push_str(&format!("{:<12} {}\n", label, PLACEHOLDER));
    }
    text
}

/// Formats listing groups, one line per group
pub fn format_groups(groups: &[ProductGroup<'_>]) -> String {
    let mut text = String::new();
    for group in groups {
        match group.kind {
            NodeKind::Main if group.variations.is_empty() => {
                text.push_str(&format!("main      {}\n", group.asin));
            }
            NodeKind::Main => {
                let variations: Vec<&str> =
                    group.variations.iter().map(|v| v.asin.as_str()).collect();
                text.push_str(&format!(
                    "main      {} ({} variations: {})\n",
                    group.asin,
                    variations.len(),
                    variations.join(", ")
                ));
            }
            NodeKind::Variation => {
                text.push_str(&format!("variation {}\n", group.asin));
            }
        }
    }
    text
}
