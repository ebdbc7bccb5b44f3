//! Listing record assembly over HTTP
//!
//! These tests use wiremock to stand in for the marketplace and run the
//! full fetch-and-extract cycle end-to-end.

use listing_lens::config::{parse_config, Config};
use listing_lens::extract::StockMethod;
use listing_lens::{
    HttpDocumentProvider, ListingFactsAssembler, ProductDocument, ProductIdentifier,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL_PAGE: &str = r#"<html><head><title>Acme Kettle</title></head><body>
    <div id="centerCol">
      <a id="bylineInfo" href="/stores/Acme">Visit the Acme Store</a>
      <div id="availability"><span>Only 3 left in stock.</span></div>
    </div>
    <div id="tabular-buybox">
      <span>Dispatches from</span><span>Amazon</span>
      <span>Sold by</span><span><a id="sellerProfileTriggerId" href="/sp?seller=A1">Acme Direct</a></span>
      <i class="a-icon a-icon-prime"></i>
    </div>
    <div id="aod-offer-list">
      <div class="aod-offer">Sold by <a href="/sp?seller=B1">Bolt Ltd</a>. Fulfilled by Amazon. 5 available</div>
      <div class="aod-offer">Sold by <a href="/sp?seller=C1">Cask Co</a>. Fulfilled by Amazon.</div>
      <div class="aod-offer">Ships from and sold by <a href="/sp?seller=D1">Jane's Shop</a>. Only 2 left in stock.</div>
    </div>
    <div id="detailBulletsWrapper_feature_div"><ul>
      <li><span class="a-text-bold">Best Sellers Rank:</span>
        #1,234 in Kitchen &amp; Home (<a href="/gp/bestsellers/kitchen">See Top 100 in Kitchen &amp; Home</a>)</li>
    </ul></div>
</body></html>"#;

fn create_test_config(base_url: &str) -> Config {
    parse_config(&format!(
        r#"
[marketplace]
base-url = "{base_url}"

[fetcher]
user-agent = "listing-lens-test/1.0"
timeout-secs = 5
connect-timeout-secs = 2
max-concurrent-requests = 2
"#
    ))
    .expect("test config is valid")
}

fn asin(raw: &str) -> ProductIdentifier {
    ProductIdentifier::parse(raw).unwrap()
}

fn assembler_for(config: &Config) -> ListingFactsAssembler<HttpDocumentProvider> {
    let provider = HttpDocumentProvider::new(&config.marketplace, &config.fetcher).unwrap();
    ListingFactsAssembler::from_config(provider, &config.fetcher)
}

#[tokio::test]
async fn test_fetch_detail_page_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0WIRE0001"))
        .and(header("user-agent", "listing-lens-test/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DETAIL_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let record = assembler_for(&config)
        .fetch(&asin("B0WIRE0001"))
        .await
        .expect("record assembled");

    assert_eq!(record.asin.as_str(), "B0WIRE0001");
    assert_eq!(record.brand, "Acme");
    assert_eq!(record.rank_text.as_deref(), Some("#1,234 in Kitchen & Home"));

    let breakdown = record.fulfillment_breakdown;
    assert_eq!(breakdown.prime, 1);
    assert_eq!(breakdown.amz, 0);
    assert_eq!(breakdown.fba, 3);
    assert_eq!(breakdown.fbm, 1);

    assert_eq!(record.stock.method, StockMethod::MultiSeller);
    // the second offer states no quantity and the buy box none either
    assert_eq!(record.stock.total, 7);
    assert_eq!(record.stock.seller_count, 2);
    assert_eq!(record.stock.raw_text, "7");
}

#[tokio::test]
async fn test_fetch_failure_yields_no_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0GONE0001"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    assert!(assembler_for(&config).fetch(&asin("B0GONE0001")).await.is_none());
}

#[tokio::test]
async fn test_current_document_is_not_refetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0CURRENT1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let provider = HttpDocumentProvider::new(&config.marketplace, &config.fetcher)
        .unwrap()
        .with_current(asin("B0CURRENT1"), ProductDocument::parse(DETAIL_PAGE));
    let assembler = ListingFactsAssembler::new(provider);

    let record = assembler.fetch(&asin("B0CURRENT1")).await.unwrap();
    assert_eq!(record.brand, "Acme");
}

#[tokio::test]
async fn test_repeated_fetches_are_identical() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0WIRE0001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let assembler = assembler_for(&config);
    let first = assembler.fetch(&asin("B0WIRE0001")).await;
    let second = assembler.fetch(&asin("B0WIRE0001")).await;

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_fetch_many_preserves_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0WIRE0001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dp/B0BARE0002"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let records = assembler_for(&config)
        .fetch_many(&[asin("B0BARE0002"), asin("B0MISSING1"), asin("B0WIRE0001")])
        .await;

    assert_eq!(records.len(), 3);
    let bare = records[0].as_ref().unwrap();
    assert_eq!(bare.brand, "");
    assert_eq!(bare.rank_text, None);
    assert_eq!(bare.stock.method, StockMethod::MainAvailability);
    assert!(records[1].is_none());
    assert_eq!(records[2].as_ref().unwrap().brand, "Acme");
}
