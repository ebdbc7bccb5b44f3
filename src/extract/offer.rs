//! Single-offer attribute extraction
//!
//! [`read_offer`] turns one offer-shaped element (an other-sellers row, a buy
//! box, a "more buying choices" block) into a [`SellerOffer`]. Every field has
//! a defined default; nothing here fails.

use crate::document::{element_text, fold, selector, text_nodes, visible_text};
use crate::extract::chain::{first_success, Strategy};
use crate::extract::dispatch::DispatchType;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

/// Seller name used when no strategy finds one
pub const UNKNOWN_SELLER: &str = "Unknown Seller";

/// Ships-from value used when neither a location nor a seller is known
pub const UNKNOWN_ORIGIN: &str = "Unknown";

/// Item condition of an offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Condition {
    #[default]
    New,
    Used,
    Refurbished,
}

/// One seller's offer as read from the page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOffer {
    pub seller_name: String,
    pub dispatch_type: DispatchType,
    pub price: Option<Decimal>,
    pub condition: Condition,
    pub rating: Option<f32>,
    pub delivery_window: Option<String>,
    pub ships_from: Option<String>,
    pub quantity: u32,
}

/// Reads every offer attribute from an offer-shaped element
pub fn read_offer(offer: ElementRef<'_>) -> SellerOffer {
    let text = visible_text(offer);
    let folded = text.to_lowercase();
    let seller_name = seller_name(offer);
    let ships_from = ships_from(offer).unwrap_or_else(|| {
        if seller_name == UNKNOWN_SELLER {
            UNKNOWN_ORIGIN.to_string()
        } else {
            seller_name.clone()
        }
    });

    SellerOffer {
        dispatch_type: offer_dispatch(&folded),
        price: price(offer),
        condition: condition(&text),
        rating: rating(offer),
        delivery_window: delivery_window(offer),
        ships_from: Some(ships_from),
        quantity: quantity(offer),
        seller_name,
    }
}

// ===== Seller name =====

/// Anchor text that names a page feature rather than a seller
const SELLER_BOILERPLATE: &[&str] = &["amazon", "details", "ratings", "reviews"];

static SOLD_BY_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    selector("#aod-offer-soldBy a, .aod-offer-soldBy a, #sellerProfileTriggerId, .offer-display-feature-text a")
});
static SELLER_NAME_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| selector(".olpSellerName a, .olpSellerName span a, .mbcMerchantName a"));
static SELLER_PROFILE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a[href*='seller='], a[href*='/sp?'], a[href*='/shops/']"));
static ANY_ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static SOLD_BY_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bsold by\s+([^.,|()]+?)(?:\s+(?:and|ships|fulfilled|dispatched|delivery|condition|seller|\d)\b|[.,|()]|$)",
    )
    .expect("valid regex")
});
static SELLER_LABEL_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bseller:\s*([^.,|()]+?)(?:\s+(?:and|ships|fulfilled|dispatched|delivery|\d)\b|[.,|()]|$)")
        .expect("valid regex")
});
static FROM_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+([^.,|()]+?)(?:\s+(?:and|sold|fulfilled|dispatched|delivery|\d)\b|[.,|()]|$)")
        .expect("valid regex")
});

fn first_seller_anchor(offer: ElementRef<'_>, anchors: &Selector) -> Option<String> {
    offer.select(anchors).map(element_text).find(|name| {
        let folded = name.to_lowercase();
        !name.is_empty()
            && !SELLER_BOILERPLATE
                .iter()
                .any(|term| folded.contains(term))
    })
}

fn name_from_sold_by_anchor(offer: ElementRef<'_>) -> Option<String> {
    first_seller_anchor(offer, &SOLD_BY_ANCHOR)
}

fn name_from_seller_anchor(offer: ElementRef<'_>) -> Option<String> {
    first_seller_anchor(offer, &SELLER_NAME_ANCHOR)
}

fn name_from_profile_link(offer: ElementRef<'_>) -> Option<String> {
    first_seller_anchor(offer, &SELLER_PROFILE_LINK)
}

fn name_from_any_anchor(offer: ElementRef<'_>) -> Option<String> {
    first_seller_anchor(offer, &ANY_ANCHOR)
}

fn captured_name(pattern: &Regex, offer: ElementRef<'_>) -> Option<String> {
    let text = visible_text(offer);
    pattern
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn name_from_sold_by_text(offer: ElementRef<'_>) -> Option<String> {
    captured_name(&SOLD_BY_TEXT, offer)
}

fn name_from_seller_label(offer: ElementRef<'_>) -> Option<String> {
    captured_name(&SELLER_LABEL_TEXT, offer)
}

fn name_from_from_text(offer: ElementRef<'_>) -> Option<String> {
    captured_name(&FROM_TEXT, offer)
}

/// Seller name, defaulting to [`UNKNOWN_SELLER`]
pub fn seller_name(offer: ElementRef<'_>) -> String {
    first_success(
        offer,
        &[
            Strategy::new("sold-by-anchor", name_from_sold_by_anchor),
            Strategy::new("seller-name-anchor", name_from_seller_anchor),
            Strategy::new("seller-profile-link", name_from_profile_link),
            Strategy::new("any-anchor", name_from_any_anchor),
            Strategy::new("sold-by-text", name_from_sold_by_text),
            Strategy::new("seller-label-text", name_from_seller_label),
            Strategy::new("from-text", name_from_from_text),
        ],
    )
    .unwrap_or_else(|| UNKNOWN_SELLER.to_string())
}

// ===== Price =====

static OFFSCREEN_PRICE: LazyLock<Selector> = LazyLock::new(|| selector(".a-price .a-offscreen"));
static PRICE_DISPLAY: LazyLock<Selector> = LazyLock::new(|| selector(".a-price"));
static OLP_PRICE: LazyLock<Selector> = LazyLock::new(|| selector(".olpOfferPrice"));
static COLOR_PRICE: LazyLock<Selector> = LazyLock::new(|| selector(".a-color-price"));

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid regex"));

/// Parses the first numeric token of a price display, commas stripped
pub fn parse_price(text: &str) -> Option<Decimal> {
    let token = PRICE_NUMBER.find(text)?.as_str().replace(',', "");
    Decimal::from_str(&token).ok()
}

fn price_at(offer: ElementRef<'_>, location: &Selector) -> Option<Decimal> {
    offer
        .select(location)
        .find_map(|el| parse_price(&element_text(el)))
}

fn price_offscreen(offer: ElementRef<'_>) -> Option<Decimal> {
    price_at(offer, &OFFSCREEN_PRICE)
}

fn price_display(offer: ElementRef<'_>) -> Option<Decimal> {
    price_at(offer, &PRICE_DISPLAY)
}

fn price_olp(offer: ElementRef<'_>) -> Option<Decimal> {
    price_at(offer, &OLP_PRICE)
}

fn price_color(offer: ElementRef<'_>) -> Option<Decimal> {
    price_at(offer, &COLOR_PRICE)
}

/// Offer price from the first price display that holds a number
pub fn price(offer: ElementRef<'_>) -> Option<Decimal> {
    first_success(
        offer,
        &[
            Strategy::new("offscreen-price", price_offscreen),
            Strategy::new("price-display", price_display),
            Strategy::new("olp-price", price_olp),
            Strategy::new("color-price", price_color),
        ],
    )
}

// ===== Dispatch, condition, rating =====

/// Offer-local dispatch: platform logistics when stated, merchant otherwise
pub fn offer_dispatch(folded: &str) -> DispatchType {
    if folded.contains("fulfilled by amazon") || folded.contains("fba") {
        DispatchType::Fba
    } else {
        DispatchType::Fbm
    }
}

static CONDITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(new|used|refurbished|renewed)\b").expect("valid regex"));

/// First condition word in the offer text, New when none
pub fn condition(text: &str) -> Condition {
    match CONDITION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .as_deref()
    {
        Some("used") => Condition::Used,
        Some("refurbished") | Some("renewed") => Condition::Refurbished,
        _ => Condition::New,
    }
}

static STAR_ICON: LazyLock<Selector> = LazyLock::new(|| selector("i[class*='a-icon-star']"));
static STAR_ALT: LazyLock<Selector> =
    LazyLock::new(|| selector("i[class*='a-icon-star'] .a-icon-alt"));
static OUT_OF_FIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d(?:[.,]\d+)?)\s*out of\s*5").expect("valid regex"));

fn parse_out_of_five(text: &str) -> Option<f32> {
    let caps = OUT_OF_FIVE.captures(text)?;
    let value: f32 = caps.get(1)?.as_str().replace(',', ".").parse().ok()?;
    (0.0..=5.0).contains(&value).then_some(value)
}

/// Star rating from an icon title, its alt text, or the offer text
pub fn rating(offer: ElementRef<'_>) -> Option<f32> {
    offer
        .select(&STAR_ICON)
        .filter_map(|icon| icon.value().attr("title"))
        .find_map(parse_out_of_five)
        .or_else(|| {
            offer
                .select(&STAR_ALT)
                .find_map(|alt| parse_out_of_five(&element_text(alt)))
        })
        .or_else(|| parse_out_of_five(&visible_text(offer)))
}

// ===== Delivery window and origin =====

static DELIVERY_PROMISE: LazyLock<Selector> = LazyLock::new(|| {
    selector("#mir-layout-DELIVERY_BLOCK, .aod-delivery-promise, [data-csa-c-delivery-time], .olpDeliveryColumn")
});

static WEEKDAY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]{1,8},\s*\d{1,2}\s+[A-Z][a-z]{2,8}\b").expect("valid regex")
});
static DAY_RANGE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}\s*-\s*\d{1,2}\s+[A-Z][a-z]{2,8}\b").expect("valid regex")
});
static DAY_MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\b")
        .expect("valid regex")
});

/// True for text that came out of inline CSS rather than page copy
pub fn looks_like_styling(candidate: &str) -> bool {
    candidate.contains("px") || candidate.contains('{') || candidate.contains("position:")
}

/// Candidate strings for date and origin matching, most specific first
fn dated_candidates(offer: ElementRef<'_>) -> Vec<String> {
    let mut candidates = Vec::new();
    for block in offer.select(&DELIVERY_PROMISE) {
        if let Some(time) = block.value().attr("data-csa-c-delivery-time") {
            candidates.push(time.trim().to_string());
        }
        candidates.extend(text_nodes(block));
    }
    candidates.extend(text_nodes(offer));
    candidates.retain(|candidate| !candidate.is_empty() && !looks_like_styling(candidate));
    candidates
}

/// Delivery window such as "Mo, 15 Sep", "17 - 18 Sep" or "15 Sep"
pub fn delivery_window(offer: ElementRef<'_>) -> Option<String> {
    let candidates = dated_candidates(offer);
    [&*WEEKDAY_DATE, &*DAY_RANGE_DATE, &*DAY_MONTH_DATE]
        .iter()
        .find_map(|pattern| {
            candidates
                .iter()
                .find_map(|candidate| pattern.find(candidate))
                .map(|m| m.as_str().to_string())
        })
}

static SHIPS_FROM_LABELLED: LazyLock<Selector> = LazyLock::new(|| {
    selector("#aod-offer-shipsFrom .a-color-base, .aod-ship-from-name, .tabular-buybox-text[tabular-attribute-name='Ships from']")
});
static SHIPS_FROM_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bships from\s+([^.,|()]+?)(?:\s+(?:and|sold|fulfilled|dispatched|delivery|\d)\b|[.,|()]|$)")
        .expect("valid regex")
});

/// Ships-from location, if the offer states one
fn ships_from(offer: ElementRef<'_>) -> Option<String> {
    let labelled = offer
        .select(&SHIPS_FROM_LABELLED)
        .map(element_text)
        .find(|text| !text.is_empty() && !looks_like_styling(text));
    if labelled.is_some() {
        return labelled;
    }

    dated_candidates(offer).iter().find_map(|candidate| {
        SHIPS_FROM_TEXT
            .captures(candidate)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|origin| !origin.is_empty())
    })
}

// ===== Quantity =====

static QUANTITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"only\s+(\d[\d,]*)\s+left",
        r"(\d[\d,]*)\+\s*in stock",
        r"(\d[\d,]*)\s+units?\s+available",
        r"(\d[\d,]*)\s+available",
        r"stock:\s*(\d[\d,]*)",
        r"quantity:\s*(\d[\d,]*)",
        r"(\d[\d,]*)\+",
        r"(\d[\d,]*)\s+in stock",
        r"available[^\d]{0,24}(\d[\d,]*)",
        r"(\d[\d,]*)\s+left",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Sub-elements of an offer that usually carry the stock message
static STOCK_LOCATIONS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "#availability",
        "[id*='availability']",
        ".a-color-success",
        ".a-color-price",
        ".a-color-state",
        "[class*='quantity']",
        "[class*='stock']",
        ".a-size-small",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

/// Parses a whole figure that may carry thousands separators
pub(crate) fn parse_count(figure: &str) -> Option<u32> {
    figure.replace(',', "").parse().ok()
}

/// Stock quantity stated in one piece of text, by pattern priority
pub fn parse_quantity(text: &str) -> Option<u32> {
    let folded = fold(text);
    QUANTITY_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(&folded)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_count(m.as_str()))
    })
}

/// Largest stock quantity stated anywhere in the offer, 0 when none
pub fn quantity(offer: ElementRef<'_>) -> u32 {
    STOCK_LOCATIONS
        .iter()
        .flat_map(|location| offer.select(location))
        .map(visible_text)
        .chain(std::iter::once(visible_text(offer)))
        .filter_map(|text| parse_quantity(&text))
        .max()
        .unwrap_or(0)
}
