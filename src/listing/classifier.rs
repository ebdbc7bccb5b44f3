//! Main/variation classification of listing nodes
//!
//! A node is a variation when any predicate of [`VARIATION_PREDICATES`]
//! holds, checked in order. Otherwise it is a main product.

use crate::document::{collapse_whitespace, fold, visible_text};
use crate::listing::nodes::ASIN_ATTR;
use regex::Regex;
use scraper::{ElementRef, Node};
use serde::Serialize;
use std::sync::LazyLock;

/// Role of a product node on a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Main,
    Variation,
}

/// A named test on a listing node
pub struct NodePredicate {
    pub name: &'static str,
    pub test: fn(ElementRef<'_>) -> bool,
}

/// Variation predicates in precedence order
pub const VARIATION_PREDICATES: &[NodePredicate] = &[
    NodePredicate {
        name: "twister-container",
        test: in_twister_container,
    },
    NodePredicate {
        name: "selectable-option",
        test: is_selectable_option,
    },
    NodePredicate {
        name: "variation-widget",
        test: in_variation_widget,
    },
    NodePredicate {
        name: "variation-container",
        test: in_variation_named_container,
    },
    NodePredicate {
        name: "pack-text",
        test: has_pack_text,
    },
    NodePredicate {
        name: "option-spacing-section",
        test: in_option_spacing_section,
    },
];

const TWISTER_IDS: &[&str] = &[
    "twister",
    "twister_feature_div",
    "twisterContainer",
    "inline-twister-expander-content",
    "variation_style_name",
    "variation_size_name",
    "variation_pattern_name",
    "variation_color_name",
];

const TWISTER_CLASSES: &[&str] = &["twister-plus-inline-twister", "inline-twister-row"];

const OPTION_CLASSES: &[&str] = &[
    "swatchAvailable",
    "swatchSelect",
    "swatchUnavailable",
    "a-button-toggle",
];

const OPTION_ROLES: &[&str] = &["option", "radio"];

const WIDGET_ATTRS: &[&str] = &["data-component-type", "data-widget", "data-csa-c-type"];

const WIDGET_TERMS: &[&str] = &["variation", "style", "size"];

static PACK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bpack of \d+\b",
        r"\b\d+[\s-]?pack\b",
        r"\bmulti-?pack\b",
        r"\bbundle\b",
        r"\bset of \d+\b",
        r"\b\d+\s*x\s*\d+\b",
        r"\b\d+\s*count\b",
        r"\b\d+\s*ct\b",
        r"\b\d+\s*pcs\b",
        r"\b\d+\s*pieces?\b",
        r"\b(?:value|twin|family|refill|bulk) pack\b",
        r"\bcase of \d+\b",
        r"\bsize:\s*\S+",
        r"\b\d+\s*(?:rolls|sheets|capsules|pods|tablets)\b",
        r"\b(?:pack|count|quantity):\s*\d+\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

static OPTION_SECTION_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:style|size|pattern|colou?r|options?|pack)\b").expect("valid regex")
});

/// The element followed by its element ancestors, nearest first
pub(crate) fn self_and_ancestors<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::successors(Some(element), |current| {
        current.parent().and_then(ElementRef::wrap)
    })
}

fn has_class(element: ElementRef<'_>, names: &[&str]) -> bool {
    element.value().classes().any(|class| names.contains(&class))
}

fn in_twister_container(node: ElementRef<'_>) -> bool {
    self_and_ancestors(node).any(|element| {
        element.value().id().is_some_and(|id| TWISTER_IDS.contains(&id))
            || has_class(element, TWISTER_CLASSES)
    })
}

fn is_selectable_option(node: ElementRef<'_>) -> bool {
    let value = node.value();
    value.name() == "option"
        || value.attr("data-defaultasin").is_some()
        || value
            .attr("role")
            .is_some_and(|role| OPTION_ROLES.contains(&role))
        || has_class(node, OPTION_CLASSES)
}

fn in_variation_widget(node: ElementRef<'_>) -> bool {
    self_and_ancestors(node).any(|element| {
        WIDGET_ATTRS.iter().any(|attr| {
            element.value().attr(attr).is_some_and(|tag| {
                let tag = tag.to_lowercase();
                WIDGET_TERMS.iter().any(|term| tag.contains(term))
            })
        })
    })
}

fn in_variation_named_container(node: ElementRef<'_>) -> bool {
    self_and_ancestors(node).any(|element| {
        let value = element.value();
        value
            .id()
            .is_some_and(|id| id.to_lowercase().contains("variation"))
            || value
                .classes()
                .any(|class| class.to_lowercase().contains("variation"))
    })
}

/// True for text that names a pack size, count or bundle
pub fn is_pack_text(text: &str) -> bool {
    let folded = fold(text);
    PACK_PATTERNS.iter().any(|pattern| pattern.is_match(&folded))
}

/// Text of `node` outside any nested identifier-bearing node
pub fn own_text(node: ElementRef<'_>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        let Node::Text(text) = descendant.value() else {
            continue;
        };
        let nested = descendant
            .ancestors()
            .take_while(|ancestor| ancestor.id() != node.id())
            .filter_map(ElementRef::wrap)
            .any(|element| {
                element
                    .value()
                    .attr(ASIN_ATTR)
                    .is_some_and(|asin| !asin.trim().is_empty())
            });
        if !nested {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn has_pack_text(node: ElementRef<'_>) -> bool {
    is_pack_text(&own_text(node))
}

fn in_option_spacing_section(node: ElementRef<'_>) -> bool {
    let Some(spacing) = self_and_ancestors(node)
        .find(|element| element.value().classes().any(|class| class.starts_with("a-spacing-")))
    else {
        return false;
    };

    let section = spacing
        .parent()
        .and_then(ElementRef::wrap)
        .unwrap_or(spacing);
    OPTION_SECTION_TEXT.is_match(&fold(&visible_text(section)))
}

/// Name of the first variation predicate that holds for `node`
pub fn matching_predicate(node: ElementRef<'_>) -> Option<&'static str> {
    VARIATION_PREDICATES
        .iter()
        .find(|predicate| (predicate.test)(node))
        .map(|predicate| predicate.name)
}

/// Classifies a listing node as main product or variation
pub fn classify_node(node: ElementRef<'_>) -> NodeKind {
    match matching_predicate(node) {
        Some(_) => NodeKind::Variation,
        None => NodeKind::Main,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{selector, ProductDocument};

    fn node_kind(body: &str) -> (NodeKind, Option<&'static str>) {
        let doc = ProductDocument::parse(&format!("<html><body>{body}</body></html>"));
        let node = doc
            .select_first(&selector("#node"))
            .expect("fixture has #node");
        (classify_node(node), matching_predicate(node))
    }

    #[test]
    fn test_plain_result_is_main() {
        assert_eq!(
            node_kind(r#"<div class="s-result-item" data-asin="B0MAIN0001" id="node">Acme Stainless Kettle</div>"#),
            (NodeKind::Main, None)
        );
    }

    #[test]
    fn test_twister_container() {
        let (kind, predicate) = node_kind(
            r#"<div id="twister_feature_div"><ul><li><span id="node" data-asin="B0VAR00001">Blue</span></li></ul></div>"#,
        );
        assert_eq!(kind, NodeKind::Variation);
        assert_eq!(predicate, Some("twister-container"));
    }

    #[test]
    fn test_selectable_option() {
        assert_eq!(
            node_kind(r#"<li id="node" class="swatchSelect" data-asin="B0VAR00001">Red</li>"#).1,
            Some("selectable-option")
        );
        assert_eq!(
            node_kind(r#"<div id="node" role="radio" data-asin="B0VAR00001">Red</div>"#).1,
            Some("selectable-option")
        );
    }

    #[test]
    fn test_variation_widget() {
        assert_eq!(
            node_kind(r#"<div data-component-type="s-size-picker"><div id="node" data-asin="B0VAR00001">Large</div></div>"#).1,
            Some("variation-widget")
        );
    }

    #[test]
    fn test_variation_named_container() {
        assert_eq!(
            node_kind(r#"<section class="productVariations"><div id="node" data-asin="B0VAR00001">Oak</div></section>"#).1,
            Some("variation-container")
        );
    }

    #[test]
    fn test_pack_text() {
        assert_eq!(
            node_kind(r#"<div id="node" data-asin="B0VAR00001">Pack of 6</div>"#),
            (NodeKind::Variation, Some("pack-text"))
        );
        assert!(is_pack_text("12 Count"));
        assert!(is_pack_text("Twin Pack"));
        assert!(is_pack_text("2 x 500"));
        assert!(!is_pack_text("Acme Stainless Kettle"));
        assert!(!is_pack_text(""));
    }

    #[test]
    fn test_pack_text_in_long_title() {
        assert_eq!(
            node_kind(
                r#"<div id="node" data-asin="B0VAR00001">Acme Stainless Steel Cordless Kettle, 1.7 Litre, Pack of 6</div>"#
            ),
            (NodeKind::Variation, Some("pack-text"))
        );
    }

    #[test]
    fn test_nested_node_text_ignored() {
        let body = r#"<div id="node" class="s-result-item" data-asin="B0MAIN0001">
            <h2>Acme Stainless Kettle</h2>
            <div class="options"><span data-asin="B0VAR00001">Pack of 2</span></div>
            <div data-asin="">Pack of 4 deal</div>
        </div>"#;
        assert_eq!(node_kind(body).0, NodeKind::Variation);

        let body = r#"<div id="node" class="s-result-item" data-asin="B0MAIN0001">
            <h2>Acme Stainless Kettle</h2>
            <div class="options"><span data-asin="B0VAR00001">Pack of 2</span></div>
        </div>"#;
        assert_eq!(node_kind(body), (NodeKind::Main, None));
    }

    #[test]
    fn test_own_text() {
        let doc = ProductDocument::parse(
            r#"<div id="node" data-asin="B0MAIN0001"><h2>Acme   Kettle</h2><span data-asin="B0VAR00001">Black</span><b>Quick boil</b></div>"#,
        );
        let node = doc.select_first(&selector("#node")).expect("fixture has #node");
        assert_eq!(own_text(node), "Acme Kettle Quick boil");
    }

    #[test]
    fn test_option_spacing_section() {
        assert_eq!(
            node_kind(
                r#"<div class="a-section"><span>Colour:</span>
                <div class="a-spacing-small"><div id="node" data-asin="B0VAR00001">Sage Green</div></div></div>"#
            )
            .1,
            Some("option-spacing-section")
        );
        assert_eq!(
            node_kind(
                r#"<div class="a-section"><span>Customers also viewed</span>
                <div class="a-spacing-small"><div id="node" data-asin="B0MAIN0001">Acme Toaster</div></div></div>"#
            )
            .0,
            NodeKind::Main
        );
    }

    #[test]
    fn test_predicate_order() {
        // both the twister container and the pack text match
        assert_eq!(
            node_kind(r#"<div id="twister"><div id="node" data-asin="B0VAR00001">Pack of 2</div></div>"#).1,
            Some("twister-container")
        );
    }
}
