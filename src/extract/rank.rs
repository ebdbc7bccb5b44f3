//! Best-seller rank extraction

use crate::document::{selector, visible_text, ProductDocument};
use regex::Regex;
use scraper::Selector;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// A product's sales rank within one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankFact {
    /// `#<grouped-number> in <category>`
    pub rank_text: String,
    pub position: u64,
    pub category: String,
}

/// Detail sections that carry the rank, in lookup order
static RANK_CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "#detailBulletsWrapper_feature_div",
        "#detailBullets_feature_div",
        "#productDetails_detailBullets_sections1",
        "#productDetails_db_sections",
        "#prodDetails",
        "#detailBulletsId",
        "#SalesRank",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

static RANK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#\s*(\d[\d,]*)\s+in\s+([^()]+?)(?:\s*\(|$)").expect("valid regex")
});

static TRAILING_RANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#.*$").expect("valid regex"));

static TRAILING_UI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+(?:brand:|(?:product|visit|asin|pro-version|ratings?|out\s+of|stars|store|details)\b).*$",
    )
    .expect("valid regex")
});

/// Drops the next field or UI block that leaked into a category name
pub fn clean_category(raw: &str) -> String {
    let without_rank = TRAILING_RANK.replace(raw.trim(), "");
    TRAILING_UI.replace(&without_rank, "").trim().to_string()
}

/// Formats an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Finds the first rank statement in collapsed text
pub fn parse_rank(text: &str) -> Option<RankFact> {
    let caps = RANK_PATTERN.captures(text)?;
    let position: u64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
    let category = clean_category(caps.get(2)?.as_str());
    if category.is_empty() {
        return None;
    }

    Some(RankFact {
        rank_text: format!("#{} in {}", group_thousands(position), category),
        position,
        category,
    })
}

/// Extracts the best-seller rank from the detail sections, or failing that
/// from anywhere in the document
pub fn extract_rank(doc: &ProductDocument) -> Option<RankFact> {
    let from_container = RANK_CONTAINERS
        .iter()
        .filter_map(|container| doc.select_first(container))
        .find_map(|section| parse_rank(&visible_text(section)));

    if let Some(rank) = from_container {
        debug!(rank = %rank.rank_text, "rank found in detail section");
        return Some(rank);
    }

    let rank = parse_rank(&doc.text());
    match &rank {
        Some(rank) => debug!(rank = %rank.rank_text, "rank found in document text"),
        None => debug!("no rank found"),
    }
    rank
}
