//! Property-based tests using proptest

use listing_lens::extract::rank::parse_rank;
use listing_lens::extract::{aggregate_stock, classify_dispatch, classify_fulfillment, DispatchType};
use listing_lens::identifier::{from_url_path, ProductIdentifier};
use listing_lens::ProductDocument;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_valid_identifiers_parse_uppercased(raw in "[A-Za-z0-9]{8,10}") {
        let asin = ProductIdentifier::parse(&raw).unwrap();
        prop_assert_eq!(asin.as_str(), raw.to_ascii_uppercase());
    }

    #[test]
    fn test_wrong_length_identifiers_rejected(raw in "[A-Z0-9]{0,7}|[A-Z0-9]{11,20}") {
        prop_assert!(ProductIdentifier::parse(&raw).is_err());
    }

    #[test]
    fn test_non_alphanumeric_identifiers_rejected(
        head in "[A-Z0-9]{4}",
        bad in "[-_./ !#%]",
        tail in "[A-Z0-9]{4}",
    ) {
        let raw = format!("{head}{bad}{tail}");
        prop_assert!(ProductIdentifier::parse(&raw).is_err());
    }

    #[test]
    fn test_long_path_segment_never_truncated(segment in "[A-Z0-9]{11,16}") {
        let dp_path = format!("/dp/{segment}");
        let product_path = format!("/gp/product/{segment}/ref=x");
        let dp = from_url_path(&dp_path);
        let product = from_url_path(&product_path);
        prop_assert!(dp.is_none());
        prop_assert!(product.is_none());
    }

    #[test]
    fn test_retailer_phrase_always_wins(prefix in "[a-z ]{0,30}", suffix in "[a-z ]{0,30}") {
        let text = format!("{prefix} sold by amazon {suffix}");
        prop_assert_eq!(classify_dispatch(&text), DispatchType::Amz);
    }

    #[test]
    fn test_extractors_total_on_arbitrary_text(text in "\\PC{0,200}") {
        let html = format!(
            "<html><body><div id=\"merchant-info\">{text}</div><div id=\"availability\">{text}</div></body></html>"
        );
        let doc = ProductDocument::parse(&html);
        let asin = ProductIdentifier::parse("B0PROP0001").unwrap();

        let breakdown = classify_fulfillment(&doc);
        prop_assert!(breakdown.prime <= 1);

        let stock = aggregate_stock(&doc, &asin);
        let summed: u32 = stock.seller_details.iter().map(|offer| offer.quantity).sum();
        prop_assert_eq!(stock.seller_count as usize, stock.seller_details.len());
        if stock.seller_count > 0 {
            prop_assert_eq!(stock.total, summed);
        }
    }

    #[test]
    fn test_rank_position_round_trips_through_grouping(position in 0u64..10_000_000_000) {
        let rank = parse_rank(&format!("#{position} in Garden & Outdoors")).unwrap();
        prop_assert_eq!(rank.position, position);
        prop_assert_eq!(rank.rank_text.replace(',', ""), format!("#{position} in Garden & Outdoors"));
    }
}
