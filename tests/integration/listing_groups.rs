//! Listing-page grouping over saved search results

use listing_lens::config::GroupingConfig;
use listing_lens::listing::{group_page, NodeKind, ProductGroup};
use listing_lens::ProductDocument;
use url::Url;

const SEARCH_PAGE: &str = r#"<html><body>
<div class="s-main-slot">
  <div class="s-result-item s-asin" data-asin="B0KETTLE01" data-layout-top="100">
    <h2><a href="/Acme-Stainless-Kettle/dp/B0KETTLE01/ref=sr_1_1">Acme Stainless Steel Cordless Kettle, 1.7 Litre, Rapid Boil</a></h2>
    <div class="s-variations">
      <a data-asin="B0KETTLE02" href="/dp/B0KETTLE02">Black</a>
    </div>
    <div class="options">
      <span data-asin="B0KETTLE03">Pack of 2</span>
    </div>
  </div>
  <div class="s-result-item s-asin" data-asin="B0TOASTER1" data-layout-top="400">
    <h2><a href="/Acme-Toaster/dp/B0TOASTER1">Acme Four Slice Toaster with Defrost and Reheat Settings</a></h2>
  </div>
  <div class="s-result-item" data-asin="">Sponsored</div>
</div>
<aside>
  <div data-asin="B0TOASTER2" data-layout-top="450">Twin Pack</div>
  <div data-asin="B0ORPHAN01" data-layout-top="2000">Set of 4</div>
</aside>
</body></html>"#;

fn base() -> Url {
    Url::parse("https://www.amazon.co.uk").unwrap()
}

fn summary(groups: &[ProductGroup<'_>]) -> Vec<(String, NodeKind, Vec<String>)> {
    groups
        .iter()
        .map(|group| {
            (
                group.asin.to_string(),
                group.kind,
                group.variations.iter().map(|v| v.asin.to_string()).collect(),
            )
        })
        .collect()
}

fn owned(asin: &str, kind: NodeKind, variations: &[&str]) -> (String, NodeKind, Vec<String>) {
    (
        asin.to_string(),
        kind,
        variations.iter().map(|v| v.to_string()).collect(),
    )
}

#[test]
fn test_search_page_without_geometry() {
    let doc = ProductDocument::parse(SEARCH_PAGE);
    let groups = group_page(&doc, None, &base(), &GroupingConfig::default());

    assert_eq!(
        summary(&groups),
        vec![
            owned("B0KETTLE01", NodeKind::Main, &["B0KETTLE02", "B0KETTLE03"]),
            owned("B0TOASTER1", NodeKind::Main, &[]),
            owned("B0TOASTER2", NodeKind::Variation, &[]),
            owned("B0ORPHAN01", NodeKind::Variation, &[]),
        ]
    );
}

#[test]
fn test_search_page_with_layout_positions() {
    let doc = ProductDocument::parse(SEARCH_PAGE);
    let config = GroupingConfig {
        position_attribute: Some("data-layout-top".to_string()),
        ..GroupingConfig::default()
    };
    let groups = group_page(&doc, None, &base(), &config);

    assert_eq!(
        summary(&groups),
        vec![
            owned("B0KETTLE01", NodeKind::Main, &["B0KETTLE02", "B0KETTLE03"]),
            owned("B0TOASTER1", NodeKind::Main, &["B0TOASTER2"]),
            owned("B0ORPHAN01", NodeKind::Variation, &[]),
        ]
    );
}

#[test]
fn test_detail_page_groups_its_own_identifier() {
    let doc = ProductDocument::parse("<html><body><div id='ppd'>Acme Kettle</div></body></html>");
    let url = Url::parse("https://www.amazon.co.uk/Acme-Kettle/dp/B0KETTLE01").unwrap();
    let groups = group_page(&doc, Some(&url), &base(), &GroupingConfig::default());

    assert_eq!(summary(&groups), vec![owned("B0KETTLE01", NodeKind::Main, &[])]);
}

#[test]
fn test_group_json_shape() {
    let doc = ProductDocument::parse(SEARCH_PAGE);
    let groups = group_page(&doc, None, &base(), &GroupingConfig::default());
    let json = serde_json::to_value(&groups).unwrap();

    assert_eq!(json[0]["asin"], "B0KETTLE01");
    assert_eq!(json[0]["type"], "main");
    assert_eq!(json[0]["variations"][1]["asin"], "B0KETTLE03");
    assert_eq!(json[3]["type"], "variation");
    assert!(json[0].get("node").is_none());
}
