//! Whitespace and case normalisation for matching

use scraper::node::Node;
use scraper::ElementRef;

/// Elements whose text never reaches the reader
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Trims and collapses every whitespace run to a single space
///
/// # Examples
///
/// ```
/// use listing_lens::document::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Visit the\n\tAcme   Store "), "Visit the Acme Store");
/// ```
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folds collapsed text for phrase matching
pub fn fold(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// All text beneath an element, collapsed
///
/// This is the equivalent of `textContent` and includes script and style
/// text; use [`visible_text`] when that matters.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text beneath an element, skipping script, style and template content
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    collapse_whitespace(&out)
}

/// Each non-empty text node beneath an element, collapsed, in document order
pub fn text_nodes(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(collapse_whitespace)
        .filter(|text| !text.is_empty())
        .collect()
}
