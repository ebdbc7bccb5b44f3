//! Parsed product documents
//!
//! [`ProductDocument`] wraps a parsed HTML tree and offers the small query
//! surface the extractors need: ordered selector lookups, element text and
//! whole-document text.

pub mod text;

use scraper::{ElementRef, Html, Selector};

pub use text::{collapse_whitespace, element_text, fold, text_nodes, visible_text};

/// A parsed product or listing page
///
/// The document is read-only to every extractor; cloning it is how a provider
/// hands the currently-displayed page out more than once.
#[derive(Debug, Clone)]
pub struct ProductDocument {
    html: Html,
}

impl ProductDocument {
    /// Parses a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The first element matching `selector`, in document order
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// All elements matching `selector`, in document order
    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }

    /// The first element found by trying each selector in turn
    ///
    /// Unlike a comma-joined selector, which returns whichever match comes
    /// first in the document, the order of `selectors` is the priority order.
    pub fn first_of<'a>(&'a self, selectors: &[&Selector]) -> Option<ElementRef<'a>> {
        selectors
            .iter()
            .find_map(|selector| self.select_first(selector))
    }

    /// Collapsed text of the first non-empty element among `selectors`
    pub fn first_text_of(&self, selectors: &[&Selector]) -> Option<String> {
        selectors
            .iter()
            .filter_map(|selector| self.select_first(selector))
            .map(element_text)
            .find(|text| !text.is_empty())
    }

    /// Collapsed visible text of the whole document
    pub fn text(&self) -> String {
        visible_text(self.root())
    }
}

/// Parses a selector literal for the static selector tables
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| panic!("invalid selector literal: {css}"))
}
