//! Stock aggregation across every offer on a product page

use crate::document::{fold, selector, visible_text, ProductDocument};
use crate::extract::fulfillment::BUY_BOX;
use crate::extract::offer::{parse_count, read_offer, SellerOffer};
use crate::identifier::ProductIdentifier;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// How a stock total was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockMethod {
    /// Summed over individual seller offers
    #[serde(rename = "multi-seller")]
    MultiSeller,
    /// Read from the single availability message
    #[serde(rename = "main-availability")]
    MainAvailability,
}

impl StockMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiSeller => "multi-seller",
            Self::MainAvailability => "main-availability",
        }
    }
}

/// Stock available for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total: u32,
    pub raw_text: String,
    pub method: StockMethod,
    pub seller_count: u32,
    /// Offers that contributed a positive quantity, in page order
    pub seller_details: Vec<SellerOffer>,
}

static OFFER_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("#aod-pinned-offer, .aod-offer, .olpOffer"));
static MORE_BUYING_CHOICES: LazyLock<Selector> =
    LazyLock::new(|| selector("#mbc, #moreBuyingChoices_feature_div"));
static NEW_AND_USED: LazyLock<Selector> = LazyLock::new(|| {
    selector("#newAccordionRow, #usedAccordionRow, #olp-upd-new, #olp-upd-used")
});
static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| selector("#availability"));

/// Availability phrasings, in priority order; `true` marks "N or more" forms
static AVAILABILITY_PATTERNS: LazyLock<Vec<(Regex, bool)>> = LazyLock::new(|| {
    [
        (r"only\s+(\d[\d,]*)\s+left", false),
        (r"(\d[\d,]*)\+", true),
        (r"stock\D{0,12}(\d[\d,]*)\+", true),
        (r"available\D{0,24}(\d[\d,]*)\+", true),
        (r"(\d[\d,]*)\s+in stock", false),
    ]
    .into_iter()
    .map(|(pattern, plus)| (Regex::new(pattern).expect("valid regex"), plus))
    .collect()
});

type BlockStrategy = for<'a> fn(&'a ProductDocument, &ProductIdentifier) -> Vec<ElementRef<'a>>;

fn other_seller_blocks<'a>(doc: &'a ProductDocument, _: &ProductIdentifier) -> Vec<ElementRef<'a>> {
    doc.select_all(&OFFER_BLOCKS)
}

fn buy_box_block<'a>(doc: &'a ProductDocument, _: &ProductIdentifier) -> Vec<ElementRef<'a>> {
    let selectors: Vec<&Selector> = BUY_BOX.iter().collect();
    doc.first_of(&selectors).into_iter().collect()
}

fn more_buying_choices_blocks<'a>(
    doc: &'a ProductDocument,
    _: &ProductIdentifier,
) -> Vec<ElementRef<'a>> {
    doc.select_all(&MORE_BUYING_CHOICES)
}

fn new_and_used_blocks<'a>(doc: &'a ProductDocument, _: &ProductIdentifier) -> Vec<ElementRef<'a>> {
    doc.select_all(&NEW_AND_USED)
}

fn identifier_scoped_blocks<'a>(
    doc: &'a ProductDocument,
    asin: &ProductIdentifier,
) -> Vec<ElementRef<'a>> {
    let css = format!(
        "[data-asin='{asin}'].a-section, [data-asin='{asin}'][class*='offer']"
    );
    let Ok(scoped) = Selector::parse(&css) else {
        return Vec::new();
    };
    doc.select_all(&scoped)
}

const BLOCK_STRATEGIES: [(&str, BlockStrategy); 5] = [
    ("other-sellers", other_seller_blocks),
    ("buy-box", buy_box_block),
    ("more-buying-choices", more_buying_choices_blocks),
    ("new-and-used", new_and_used_blocks),
    ("identifier-scoped", identifier_scoped_blocks),
];

fn contains(outer: ElementRef<'_>, inner: ElementRef<'_>) -> bool {
    inner.ancestors().any(|ancestor| ancestor.id() == outer.id())
}

fn overlaps(a: ElementRef<'_>, b: ElementRef<'_>) -> bool {
    a.id() == b.id() || contains(a, b) || contains(b, a)
}

/// Offer blocks from every strategy, each page region read at most once
pub fn offer_blocks<'a>(doc: &'a ProductDocument, asin: &ProductIdentifier) -> Vec<ElementRef<'a>> {
    let mut taken: Vec<ElementRef<'a>> = Vec::new();
    for (name, strategy) in BLOCK_STRATEGIES {
        for block in strategy(doc, asin) {
            if taken.iter().any(|seen| overlaps(*seen, block)) {
                trace!(strategy = name, "skipping overlapping block");
                continue;
            }
            trace!(strategy = name, "offer block");
            taken.push(block);
        }
    }
    taken
}

/// Reads the availability message, returning the figure and its display text
pub fn parse_availability(text: &str) -> Option<(u32, String)> {
    let folded = fold(text);
    AVAILABILITY_PATTERNS.iter().find_map(|(pattern, plus)| {
        let figure = parse_count(pattern.captures(&folded)?.get(1)?.as_str())?;
        let raw = if *plus {
            format!("{figure}+")
        } else {
            figure.to_string()
        };
        Some((figure, raw))
    })
}

fn main_availability(doc: &ProductDocument) -> StockSummary {
    let text = doc
        .select_first(&AVAILABILITY)
        .map(visible_text)
        .unwrap_or_default();
    let (total, raw_text) = parse_availability(&text).unwrap_or((0, text));

    StockSummary {
        total,
        raw_text,
        method: StockMethod::MainAvailability,
        seller_count: 0,
        seller_details: Vec::new(),
    }
}

/// Aggregates the stock of every offer on the page
///
/// Falls back to the main availability message when no offer states a
/// positive quantity.
pub fn aggregate_stock(doc: &ProductDocument, asin: &ProductIdentifier) -> StockSummary {
    let seller_details: Vec<SellerOffer> = offer_blocks(doc, asin)
        .into_iter()
        .map(read_offer)
        .filter(|offer| offer.quantity > 0)
        .collect();
    let total = seller_details
        .iter()
        .fold(0u32, |sum, offer| sum.saturating_add(offer.quantity));

    if total == 0 {
        let summary = main_availability(doc);
        debug!(total = summary.total, raw = %summary.raw_text, "stock from availability");
        return summary;
    }

    debug!(total, sellers = seller_details.len(), "stock from seller offers");
    StockSummary {
        total,
        raw_text: total.to_string(),
        method: StockMethod::MultiSeller,
        seller_count: seller_details.len() as u32,
        seller_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> ProductDocument {
        ProductDocument::parse(&format!("<html><body>{body}</body></html>"))
    }

    fn asin() -> ProductIdentifier {
        ProductIdentifier::parse("B0TEST1234").unwrap()
    }

    #[test]
    fn test_multi_seller_total() {
        let doc = page(
            r#"<div class="aod-offer">Sold by <a href="/sp?seller=A">Acme</a>. Only 3 left in stock.</div>
            <div class="aod-offer">Sold by <a href="/sp?seller=B">Bolt</a>. 5 available</div>"#,
        );
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.method, StockMethod::MultiSeller);
        assert_eq!(stock.total, 8);
        assert_eq!(stock.raw_text, "8");
        assert_eq!(stock.seller_count, 2);
        assert_eq!(stock.seller_details[0].seller_name, "Acme");
        assert_eq!(stock.seller_details[1].quantity, 5);
    }

    #[test]
    fn test_nested_blocks_read_once() {
        let doc = page(
            r#"<div id="aod-pinned-offer"><div class="aod-offer">Only 2 left in stock</div></div>
            <div id="moreBuyingChoices_feature_div"><div class="olpOffer">Only 4 left in stock</div></div>"#,
        );
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.total, 6);
        assert_eq!(stock.seller_count, 2);
    }

    #[test]
    fn test_zero_quantity_offers_not_counted() {
        let doc = page(
            r#"<div id="buybox">In stock. Ships from and sold by Acme.</div>
            <div class="aod-offer">Only 1 left in stock</div>"#,
        );
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.seller_count, 1);
        assert_eq!(stock.total, 1);
    }

    #[test]
    fn test_buy_box_quantity() {
        let doc = page(r#"<div id="buybox">Only 3 left in stock. Sold by Acme.</div>"#);
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.method, StockMethod::MultiSeller);
        assert_eq!(stock.total, 3);
        assert_eq!(stock.seller_count, 1);
    }

    #[test]
    fn test_standalone_more_buying_choices() {
        let doc = page(r#"<div id="mbc">Other sellers. Only 5 left in stock.</div>"#);
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.method, StockMethod::MultiSeller);
        assert_eq!(stock.total, 5);
        assert_eq!(stock.seller_count, 1);
    }

    #[test]
    fn test_new_and_used_rows() {
        let doc = page(
            r#"<div id="newAccordionRow">New. Only 2 left in stock.</div>
            <div id="olp-upd-new">4 available</div>"#,
        );
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.method, StockMethod::MultiSeller);
        assert_eq!(stock.total, 6);
        assert_eq!(stock.seller_count, 2);
    }

    #[test]
    fn test_identifier_scoped_section() {
        let doc = page(
            r#"<div data-asin="B0TEST1234" class="a-section">Only 7 left in stock</div>
            <div data-asin="B0OTHER999" class="a-section">Only 9 left in stock</div>"#,
        );
        assert_eq!(aggregate_stock(&doc, &asin()).total, 7);
    }

    #[test]
    fn test_availability_fallback() {
        let doc = page(r#"<div id="availability"><span>Only 4 left in stock.</span></div>"#);
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.method, StockMethod::MainAvailability);
        assert_eq!(stock.total, 4);
        assert_eq!(stock.raw_text, "4");
        assert_eq!(stock.seller_count, 0);
        assert!(stock.seller_details.is_empty());
    }

    #[test]
    fn test_availability_without_figure() {
        let doc = page(r#"<div id="availability"> In stock. </div>"#);
        let stock = aggregate_stock(&doc, &asin());
        assert_eq!(stock.total, 0);
        assert_eq!(stock.raw_text, "In stock.");
        assert_eq!(stock.method, StockMethod::MainAvailability);
    }

    #[test]
    fn test_no_stock_information() {
        let stock = aggregate_stock(&page("<p>Kettle</p>"), &asin());
        assert_eq!(stock.total, 0);
        assert_eq!(stock.raw_text, "");
        assert_eq!(stock.method, StockMethod::MainAvailability);
    }

    #[test]
    fn test_parse_availability() {
        assert_eq!(parse_availability("Only 3 left in stock"), Some((3, "3".into())));
        assert_eq!(parse_availability("20+ available"), Some((20, "20+".into())));
        assert_eq!(parse_availability("In Stock: 12+"), Some((12, "12+".into())));
        assert_eq!(parse_availability("14 in stock"), Some((14, "14".into())));
        assert_eq!(parse_availability("Currently unavailable."), None);
        assert_eq!(parse_availability("1,000+ in stock"), Some((1000, "1000+".into())));
        assert_eq!(parse_availability("Only 1,200 left"), Some((1200, "1200".into())));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(StockMethod::MultiSeller.as_str(), "multi-seller");
        assert_eq!(
            serde_json::to_string(&StockMethod::MainAvailability).unwrap(),
            "\"main-availability\""
        );
    }
}
