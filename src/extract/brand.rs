//! Brand extraction

use crate::document::{element_text, selector, ProductDocument};
use crate::extract::chain::{first_success_named, Strategy};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use tracing::debug;

static BYLINE: LazyLock<Selector> = LazyLock::new(|| selector("#bylineInfo, #brand"));

static OVERVIEW_ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("#productOverview_feature_div tr"));
static OVERVIEW_HEADER: LazyLock<Selector> = LazyLock::new(|| selector("th, td.a-span3"));
static OVERVIEW_VALUE: LazyLock<Selector> = LazyLock::new(|| selector("td.a-span9"));

static DETAIL_ROWS: LazyLock<Selector> = LazyLock::new(|| {
    selector("#productDetails_techSpec_section_1 tr, #productDetails_detailBullets_sections1 tr")
});
static DETAIL_BULLETS: LazyLock<Selector> =
    LazyLock::new(|| selector("#detailBullets_feature_div li"));
static BULLET_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("span.a-text-bold"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

static STORE_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^visit the\s+|\s*store$").expect("valid regex"));
static BRAND_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)brand:\s*").expect("valid regex"));

/// Strips "Visit the ... Store" and "Brand:" wording from a byline
pub fn clean_byline(raw: &str) -> String {
    let stripped = STORE_BOILERPLATE.replace_all(raw.trim(), "");
    BRAND_PREFIX.replace(&stripped, "").trim().to_string()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn brand_from_byline(doc: &ProductDocument) -> Option<String> {
    let byline = doc.select_first(&BYLINE)?;
    non_empty(clean_byline(&element_text(byline)))
}

fn overview_value(row: ElementRef<'_>) -> Option<String> {
    let header = row.select(&OVERVIEW_HEADER).next()?;
    if !element_text(header).eq_ignore_ascii_case("brand") {
        return None;
    }

    // The value cell is the a-span9 cell, or failing that the first cell
    // that is not the header
    row.select(&OVERVIEW_VALUE)
        .next()
        .or_else(|| row.select(&DATA_CELL).find(|cell| cell.id() != header.id()))
        .map(element_text)
}

fn brand_from_overview(doc: &ProductDocument) -> Option<String> {
    doc.html()
        .select(&OVERVIEW_ROWS)
        .find_map(overview_value)
        .and_then(non_empty)
}

fn starts_with_brand(label: &str) -> bool {
    label
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("brand"))
}

fn detail_row_value(row: ElementRef<'_>) -> Option<String> {
    let header = row.select(&HEADER_CELL).next()?;
    if !starts_with_brand(&element_text(header)) {
        return None;
    }
    row.select(&DATA_CELL).next().map(element_text)
}

fn detail_bullet_value(item: ElementRef<'_>) -> Option<String> {
    let label = item.select(&BULLET_LABEL).next()?;
    let label_text = element_text(label);
    if !starts_with_brand(&label_text) {
        return None;
    }
    let full = element_text(item);
    let value = full.strip_prefix(&label_text).unwrap_or(&full);
    Some(value.trim_start_matches([':', ' ', '\u{200f}', '\u{200e}']).trim().to_string())
}

fn brand_from_detail_bullets(doc: &ProductDocument) -> Option<String> {
    doc.html()
        .select(&DETAIL_ROWS)
        .find_map(detail_row_value)
        .or_else(|| doc.html().select(&DETAIL_BULLETS).find_map(detail_bullet_value))
        .and_then(non_empty)
}

/// Extracts the product brand, or an empty string when none is stated
///
/// Tried in order: the byline, the product-overview table, the detail
/// bullets.
pub fn extract_brand(doc: &ProductDocument) -> String {
    match first_success_named(
        doc,
        &[
            Strategy::new("byline", brand_from_byline),
            Strategy::new("overview-table", brand_from_overview),
            Strategy::new("detail-bullets", brand_from_detail_bullets),
        ],
    ) {
        Some((strategy, brand)) => {
            debug!(strategy, brand = %brand, "brand extracted");
            brand
        }
        None => {
            debug!("no brand found");
            String::new()
        }
    }
}
