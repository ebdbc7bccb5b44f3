//! Product node selection on listing pages

use crate::document::{selector, ProductDocument};
use crate::identifier::{from_href, from_url_path, ProductIdentifier};
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

/// Attribute that tags listing elements with their identifier
pub const ASIN_ATTR: &str = "data-asin";

static ASIN_TAGGED: LazyLock<Selector> = LazyLock::new(|| selector("[data-asin]"));
static PRODUCT_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| selector("a[href*='/dp/'], a[href*='/gp/product/']"));

/// A listing element that stands for one product
#[derive(Debug, Clone)]
pub struct ProductNode<'a> {
    pub asin: ProductIdentifier,
    pub element: ElementRef<'a>,
}

/// Identifier from an element's attribute, else from its first product link
pub fn node_identifier(element: ElementRef<'_>, base: &Url) -> Option<ProductIdentifier> {
    element
        .value()
        .attr(ASIN_ATTR)
        .and_then(ProductIdentifier::from_attribute)
        .or_else(|| {
            element
                .select(&PRODUCT_ANCHOR)
                .next()
                .and_then(|anchor| anchor.value().attr("href"))
                .and_then(|href| from_href(href, base))
        })
}

/// Every element under `root` with a non-empty identifier attribute that
/// resolves to a valid identifier, in document order
pub fn select_product_nodes<'a>(root: ElementRef<'a>, base: &Url) -> Vec<ProductNode<'a>> {
    root.select(&ASIN_TAGGED)
        .filter(|element| {
            element
                .value()
                .attr(ASIN_ATTR)
                .is_some_and(|value| !value.trim().is_empty())
        })
        .filter_map(|element| {
            node_identifier(element, base).map(|asin| ProductNode { asin, element })
        })
        .collect()
}

/// Product nodes of a page, falling back to the page's own identifier on
/// detail pages that carry no tagged nodes
pub fn page_nodes<'a>(
    doc: &'a ProductDocument,
    page_url: Option<&Url>,
    base: &Url,
) -> Vec<ProductNode<'a>> {
    let nodes = select_product_nodes(doc.root(), base);
    if !nodes.is_empty() {
        return nodes;
    }

    page_url
        .and_then(|url| {
            let mut target = url.path().to_string();
            if let Some(query) = url.query() {
                target.push('?');
                target.push_str(query);
            }
            from_url_path(&target)
        })
        .map(|asin| ProductNode {
            asin,
            element: doc.root(),
        })
        .into_iter()
        .collect()
}
