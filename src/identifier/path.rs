use crate::identifier::ProductIdentifier;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `/dp/<id>` followed by a path, query or fragment boundary
static DP_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/dp/([a-z0-9]{8,10})(?:[/?#]|$)").expect("valid regex")
});

/// `/gp/product/<id>` followed by a path, query or fragment boundary
static GP_PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/gp/product/([a-z0-9]{8,10})(?:[/?#]|$)").expect("valid regex")
});

/// Extracts an identifier from a URL path (optionally with query string)
///
/// `/dp/` paths are preferred over `/gp/product/` paths. A segment that is
/// longer than ten characters never yields a truncated identifier.
///
/// # Examples
///
/// ```
/// use listing_lens::identifier::from_url_path;
///
/// let asin = from_url_path("/Kettle-Stainless/dp/b07xyz1234/ref=sr_1_1").unwrap();
/// assert_eq!(asin.as_str(), "B07XYZ1234");
/// assert!(from_url_path("/dp/B07XYZ12345").is_none());
/// ```
pub fn from_url_path(path: &str) -> Option<ProductIdentifier> {
    [&*DP_PATH, &*GP_PRODUCT_PATH]
        .iter()
        .find_map(|pattern| pattern.captures(path))
        .and_then(|caps| caps.get(1))
        .and_then(|m| ProductIdentifier::parse(m.as_str()).ok())
}

/// Resolves an anchor href against `base` and extracts its identifier
///
/// Returns None for hrefs that do not resolve or do not name a product.
pub fn from_href(href: &str, base: &Url) -> Option<ProductIdentifier> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let resolved = base.join(href).ok()?;
    let mut target = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        target.push('?');
        target.push_str(query);
    }

    from_url_path(&target)
}

/// Builds the canonical detail-page URL for an identifier
///
/// # Examples
///
/// ```
/// use listing_lens::identifier::{detail_url, ProductIdentifier};
/// use url::Url;
///
/// let base = Url::parse("https://www.amazon.co.uk").unwrap();
/// let asin = ProductIdentifier::parse("B07XYZ1234").unwrap();
/// assert_eq!(
///     detail_url(&base, &asin).unwrap().as_str(),
///     "https://www.amazon.co.uk/dp/B07XYZ1234"
/// );
/// ```
pub fn detail_url(base: &Url, asin: &ProductIdentifier) -> Result<Url, url::ParseError> {
    base.join(&format!("/dp/{}", asin))
}
