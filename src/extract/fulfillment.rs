//! Fulfillment responsibility breakdown
//!
//! The main seller and each other-seller row are classified with
//! [`classify_dispatch`] into explicit [`DispatchTally`] values, and
//! [`classify_fulfillment`] sums them into a [`FulfillmentBreakdown`].

use crate::document::{fold, selector, visible_text, ProductDocument};
use crate::extract::dispatch::{classify_dispatch, count_mentions, DispatchTally, DispatchType};
use scraper::Selector;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Offer counts by dispatch responsibility
///
/// `prime` is a flag (0 or 1), the other fields are offer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FulfillmentBreakdown {
    pub amz: u32,
    pub prime: u32,
    pub fba: u32,
    pub fbm: u32,
}

impl FulfillmentBreakdown {
    /// Sums the main-seller and other-seller tallies
    pub fn from_tallies(main: DispatchTally, others: DispatchTally, prime: bool) -> Self {
        let total = main + others;
        Self {
            amz: total.amz,
            prime: u32::from(prime),
            fba: total.fba,
            fbm: total.fbm,
        }
    }

    /// Number of offers accounted for
    pub fn offers(&self) -> u32 {
        self.amz + self.fba + self.fbm
    }
}

static MERCHANT_INFO: LazyLock<Selector> = LazyLock::new(|| selector("#merchant-info"));

/// Buy-box containers, in lookup order
pub(crate) static BUY_BOX: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["#tabular-buybox", "#buybox", "#desktop_buybox", "#buyBoxAccordion"]
        .iter()
        .map(|css| selector(css))
        .collect()
});

static OTHER_SELLER_SECTIONS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "#aod-offer-list",
        "#aod-offer",
        ".aod-offer-list",
        "#olp_feature_div",
        "#moreBuyingChoices_feature_div",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

static OTHER_SELLER_ROWS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [".aod-offer", ".aod-information-block", ".olpOffer", ".a-section"]
        .iter()
        .map(|css| selector(css))
        .collect()
});

static PRIME_BADGE: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-icon-prime, i.a-prime, .prime-logo, #prime-badge"));

const PRIME_CONTEXT: &[&str] = &["delivery", "shipping", "free"];

/// Main-seller text: merchant info when non-empty, else the first buy box
pub fn main_seller_text(doc: &ProductDocument) -> Option<String> {
    let merchant = doc
        .select_first(&MERCHANT_INFO)
        .map(visible_text)
        .filter(|text| !text.is_empty());
    if merchant.is_some() {
        return merchant;
    }

    let selectors: Vec<&Selector> = BUY_BOX.iter().collect();
    doc.first_of(&selectors)
        .map(visible_text)
        .filter(|text| !text.is_empty())
}

/// Dispatch responsibility of the main seller
pub fn main_dispatch(doc: &ProductDocument) -> DispatchType {
    main_seller_text(doc)
        .map(|text| classify_dispatch(&fold(&text)))
        .unwrap_or(DispatchType::Unknown)
}

fn tally_rows(doc: &ProductDocument) -> DispatchTally {
    let Some(section) = OTHER_SELLER_SECTIONS
        .iter()
        .find_map(|css| doc.select_first(css))
    else {
        return DispatchTally::default();
    };

    let rows = OTHER_SELLER_ROWS
        .iter()
        .map(|css| section.select(css).collect::<Vec<_>>())
        .find(|rows| !rows.is_empty())
        .unwrap_or_default();

    let mut tally = DispatchTally::default();
    for row in rows {
        let dispatch = classify_dispatch(&fold(&visible_text(row)));
        trace!(dispatch = dispatch.as_str(), "other-seller row");
        tally.record(dispatch);
    }
    tally
}

/// Other-seller offers by dispatch type
///
/// Falls back to whole-document phrase counts, each reduced by one for the
/// main seller's own mention, when no row could be classified.
pub fn other_seller_tally(doc: &ProductDocument) -> DispatchTally {
    let rows = tally_rows(doc);
    if !rows.is_empty() {
        return rows;
    }

    let mentions = count_mentions(&fold(&doc.text())).discount_one_each();
    debug!(
        amz = mentions.amz,
        fba = mentions.fba,
        fbm = mentions.fbm,
        "no classified other-seller rows, using document phrase counts"
    );
    mentions
}

fn is_prime_copy(text: &str) -> bool {
    let folded = fold(text);
    folded.contains("prime") && PRIME_CONTEXT.iter().any(|word| folded.contains(word))
}

/// True when the page shows a Prime badge, or Prime delivery copy in the
/// merchant info or the buy box
pub fn has_prime(doc: &ProductDocument) -> bool {
    if doc.select_first(&PRIME_BADGE).is_some() {
        return true;
    }
    let selectors: Vec<&Selector> = BUY_BOX.iter().collect();
    doc.select_first(&MERCHANT_INFO)
        .into_iter()
        .chain(doc.first_of(&selectors))
        .any(|el| is_prime_copy(&visible_text(el)))
}

/// Classifies who sells and who ships every offer on the page
pub fn classify_fulfillment(doc: &ProductDocument) -> FulfillmentBreakdown {
    let main_text = main_seller_text(doc);
    let main = main_text
        .as_deref()
        .map(|text| classify_dispatch(&fold(text)))
        .unwrap_or(DispatchType::Unknown);
    let others = other_seller_tally(doc);
    let prime = has_prime(doc);

    let breakdown = FulfillmentBreakdown::from_tallies(DispatchTally::single(main), others, prime);
    debug!(
        main = main.as_str(),
        amz = breakdown.amz,
        fba = breakdown.fba,
        fbm = breakdown.fbm,
        prime = breakdown.prime,
        "fulfillment classified"
    );
    breakdown
}
