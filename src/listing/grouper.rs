//! Variation grouping
//!
//! Every main node, in document order, claims the not-yet-claimed variation
//! nodes related to it. Variations left unclaimed become standalone groups.

use crate::identifier::ProductIdentifier;
use crate::listing::classifier::{classify_node, self_and_ancestors, NodeKind};
use crate::listing::geometry::{vertical_distance, Geometry};
use crate::listing::nodes::{ProductNode, ASIN_ATTR};
use scraper::ElementRef;
use serde::Serialize;
use tracing::{debug, trace};

/// Default maximum vertical distance for proximity relatedness
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 200.0;

/// Listing-item classes that mark a product container
const CONTAINER_CLASSES: &[&str] = &["s-result-item", "s-asin", "s-card-container"];

/// A variation owned by a main group
#[derive(Debug, Clone, Serialize)]
pub struct GroupedVariation<'a> {
    pub asin: ProductIdentifier,
    #[serde(skip)]
    pub node: ElementRef<'a>,
}

/// A main product with its variations, or an unclaimed variation
#[derive(Debug, Clone, Serialize)]
pub struct ProductGroup<'a> {
    pub asin: ProductIdentifier,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip)]
    pub node: ElementRef<'a>,
    pub variations: Vec<GroupedVariation<'a>>,
}

/// Which relatedness test tied a variation to a main node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    SharedContainer,
    SharedParent,
    Proximity,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharedContainer => "shared-container",
            Self::SharedParent => "shared-parent",
            Self::Proximity => "proximity",
        }
    }
}

fn is_container(element: ElementRef<'_>) -> bool {
    let value = element.value();
    value
        .attr(ASIN_ATTR)
        .is_some_and(|asin| !asin.trim().is_empty())
        || value.classes().any(|class| CONTAINER_CLASSES.contains(&class))
}

/// Nearest product container strictly above `element`
pub fn enclosing_container(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    self_and_ancestors(element).skip(1).find(|el| is_container(*el))
}

/// `element` itself when it is a product container, else its enclosing one
pub fn own_container(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if is_container(element) {
        Some(element)
    } else {
        enclosing_container(element)
    }
}

fn shares_container(main: ElementRef<'_>, variation: ElementRef<'_>) -> bool {
    let Some(container) = enclosing_container(variation) else {
        return false;
    };
    [own_container(main), enclosing_container(main)]
        .into_iter()
        .flatten()
        .any(|candidate| candidate == container)
}

fn shares_parent(main: ElementRef<'_>, variation: ElementRef<'_>) -> bool {
    match (main.parent(), variation.parent()) {
        (Some(a), Some(b)) => a.id() == b.id(),
        _ => false,
    }
}

/// Groups classified listing nodes
pub struct VariationGrouper<'g> {
    geometry: &'g dyn Geometry,
    threshold: f64,
}

impl<'g> VariationGrouper<'g> {
    pub fn new(geometry: &'g dyn Geometry, threshold: f64) -> Self {
        Self {
            geometry,
            threshold,
        }
    }

    /// The first relatedness test that ties `variation` to `main`
    pub fn relation(&self, main: ElementRef<'_>, variation: ElementRef<'_>) -> Option<Relation> {
        if shares_container(main, variation) {
            return Some(Relation::SharedContainer);
        }
        if shares_parent(main, variation) {
            return Some(Relation::SharedParent);
        }
        vertical_distance(self.geometry, main, variation)
            .filter(|distance| *distance < self.threshold)
            .map(|_| Relation::Proximity)
    }

    /// Groups nodes already tagged with their kind
    ///
    /// `nodes` must be in document order; the output keeps that order.
    pub fn group_classified<'a>(&self, nodes: &[(ProductNode<'a>, NodeKind)]) -> Vec<ProductGroup<'a>> {
        let mut claimed = vec![false; nodes.len()];
        let mut owned: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

        for (main_idx, (main, kind)) in nodes.iter().enumerate() {
            if *kind != NodeKind::Main {
                continue;
            }
            for (var_idx, (variation, kind)) in nodes.iter().enumerate() {
                if *kind != NodeKind::Variation
                    || claimed[var_idx]
                    || variation.element == main.element
                {
                    continue;
                }
                if let Some(relation) = self.relation(main.element, variation.element) {
                    trace!(
                        main = %main.asin,
                        variation = %variation.asin,
                        relation = relation.as_str(),
                        "variation claimed"
                    );
                    claimed[var_idx] = true;
                    owned[main_idx].push(var_idx);
                }
            }
        }

        let groups: Vec<ProductGroup<'a>> = nodes
            .iter()
            .enumerate()
            .filter(|(idx, (_, kind))| *kind == NodeKind::Main || !claimed[*idx])
            .map(|(idx, (node, kind))| ProductGroup {
                asin: node.asin.clone(),
                kind: *kind,
                node: node.element,
                variations: owned[idx]
                    .iter()
                    .map(|&var_idx| GroupedVariation {
                        asin: nodes[var_idx].0.asin.clone(),
                        node: nodes[var_idx].0.element,
                    })
                    .collect(),
            })
            .collect();

        debug!(
            nodes = nodes.len(),
            groups = groups.len(),
            claimed = claimed.iter().filter(|c| **c).count(),
            "listing grouped"
        );
        groups
    }

    /// Classifies and groups listing nodes
    pub fn group<'a>(&self, nodes: &[ProductNode<'a>]) -> Vec<ProductGroup<'a>> {
        let classified: Vec<(ProductNode<'a>, NodeKind)> = nodes
            .iter()
            .map(|node| (node.clone(), classify_node(node.element)))
            .collect();
        self.group_classified(&classified)
    }
}
