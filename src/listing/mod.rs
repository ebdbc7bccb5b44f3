//! Listing-page analysis
//!
//! Finds the product nodes of a listing page, classifies each as a main
//! product or a variation, and groups variations under their main product.
//!
//! # Example
//!
//! ```
//! use listing_lens::listing::{group_listing, select_product_nodes, NoGeometry, NodeKind};
//! use listing_lens::ProductDocument;
//! use url::Url;
//!
//! let doc = ProductDocument::parse(
//!     r#"<div><div data-asin="B0MAIN0001">Acme Kettle</div><div data-asin="B0VAR00001">Pack of 6</div></div>"#,
//! );
//! let base = Url::parse("https://www.amazon.co.uk").unwrap();
//! let groups = group_listing(&select_product_nodes(doc.root(), &base), &NoGeometry, 200.0);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].kind, NodeKind::Main);
//! assert_eq!(groups[0].variations[0].asin.as_str(), "B0VAR00001");
//! ```

pub mod classifier;
pub mod geometry;
pub mod grouper;
pub mod nodes;

pub use classifier::{classify_node, matching_predicate, NodeKind};
pub use geometry::{AttributeGeometry, Geometry, NoGeometry};
pub use grouper::{GroupedVariation, ProductGroup, Relation, VariationGrouper};
pub use nodes::{page_nodes, select_product_nodes, ProductNode};

use crate::config::GroupingConfig;
use crate::document::ProductDocument;
use url::Url;

/// Classifies and groups listing nodes given in document order
pub fn group_listing<'a>(
    nodes: &[ProductNode<'a>],
    geometry: &dyn Geometry,
    proximity_threshold: f64,
) -> Vec<ProductGroup<'a>> {
    VariationGrouper::new(geometry, proximity_threshold).group(nodes)
}

/// Groups the product nodes of a whole page using the grouping configuration
///
/// Proximity uses the configured position attribute when one is set.
pub fn group_page<'a>(
    doc: &'a ProductDocument,
    page_url: Option<&Url>,
    base: &Url,
    config: &GroupingConfig,
) -> Vec<ProductGroup<'a>> {
    let nodes = page_nodes(doc, page_url, base);
    match AttributeGeometry::from_config(config) {
        Some(geometry) => group_listing(&nodes, &geometry, config.proximity_threshold),
        None => group_listing(&nodes, &NoGeometry, config.proximity_threshold),
    }
}
