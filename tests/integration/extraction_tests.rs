use super::*;
use hot_picks::extractor::ListingExtractor;
use hot_picks::models::{ListingSource, NEWLY_LISTED, UNKNOWN_PRICE};
use hot_picks::orchestrator::{collect_products, SourceOutcome};

#[test]
fn test_movers_shakers_fixture() -> anyhow::Result<()> {
    let config = get_test_config();
    let extractor = ListingExtractor::new(&config.selectors)?;

    let products = extractor.extract(MOVERS_SHAKERS_US, ListingSource::MoversShakers, market(&config, "usa"));

    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Wireless Bluetooth Earbuds Pro with Charging Case",
            "Digital Kitchen Food Scale, 11lb",
            "Stainless Steel Insulated Water Bottle 32oz",
            "Adjustable Dumbbell Set for Home Gym",
        ]
    );

    assert_eq!(products[0].growth, "+2,310%");
    assert_eq!(products[0].price, "$29.99");
    assert_eq!(products[1].growth, "+185%");
    // No percentage badge on the page
    assert_eq!(products[2].growth, NEWLY_LISTED);
    assert_eq!(products[2].price, "24.");
    assert_eq!(products[3].price, UNKNOWN_PRICE);

    for product in &products {
        assert_eq!(product.market, "美国");
        assert_eq!(product.flag, "🇺🇸");
        assert_eq!(product.source, ListingSource::MoversShakers);
    }

    Ok(())
}

#[test]
fn test_best_sellers_fixture() -> anyhow::Result<()> {
    let config = get_test_config();
    let extractor = ListingExtractor::new(&config.selectors)?;

    let products = extractor.extract(BEST_SELLERS_US, ListingSource::BestSellers, market(&config, "usa"));

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Hydrating Facial Toner with Rose Water");
    assert_eq!(products[0].price, "$9.87");
    assert_eq!(products[0].growth, "#1 热销");
    // The nameless second item is dropped but still counts as a position
    assert_eq!(products[1].name, "Magnetic Phone Case for iPhone 15");
    assert_eq!(products[1].growth, "#3 热销");
    assert_eq!(products[1].source, ListingSource::BestSellers);

    Ok(())
}

#[test]
fn test_listing_caps() -> anyhow::Result<()> {
    let config = get_test_config();
    let extractor = ListingExtractor::new(&config.selectors)?;

    let names: Vec<String> = (0..20).map(|i| format!("Trending gadget number {}", i)).collect();
    let movers: Vec<(&str, &str, Option<&str>)> =
        names.iter().map(|n| (n.as_str(), "$5.00", Some("+10%"))).collect();
    let sellers: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "$5.00")).collect();

    let de = market(&config, "de");
    let movers = extractor.extract(&movers_page(&movers), ListingSource::MoversShakers, de);
    let sellers = extractor.extract(&best_sellers_page(&sellers), ListingSource::BestSellers, de);

    assert_eq!(movers.len(), 15);
    assert_eq!(sellers.len(), 10);
    assert_eq!(sellers[9].growth, "#10 热销");
    assert_eq!(movers[0].market_label(), "🇩🇪 德国");

    Ok(())
}

#[test]
fn test_collect_visits_markets_in_order() -> anyhow::Result<()> {
    let config = get_test_config();
    let extractor = ListingExtractor::new(&config.selectors)?;
    let uk = market(&config, "uk");

    let fetcher = FixtureFetcher::new()
        .with_page(&uk.movers_shakers, movers_page(&[("Silicone Kitchen Utensil Set", "£18.99", Some("+120%"))]))
        .with_page(&uk.best_sellers, best_sellers_page(&[("Reusable Water Bottle 1L", "£9.99")]));

    let (products, outcomes) = collect_products(&fetcher, &extractor, &config.markets);

    assert_eq!(products.len(), 2);
    assert_eq!(outcomes.len(), 6);

    let visited: Vec<(&str, ListingSource, bool)> = outcomes
        .iter()
        .map(|outcome| match outcome {
            SourceOutcome::Scraped { market, source, .. } => (market.as_str(), *source, true),
            SourceOutcome::Failed { market, source, .. } => (market.as_str(), *source, false),
        })
        .collect();
    assert_eq!(
        visited,
        vec![
            ("usa", ListingSource::MoversShakers, false),
            ("usa", ListingSource::BestSellers, false),
            ("uk", ListingSource::MoversShakers, true),
            ("uk", ListingSource::BestSellers, true),
            ("de", ListingSource::MoversShakers, false),
            ("de", ListingSource::BestSellers, false),
        ]
    );

    match &outcomes[0] {
        SourceOutcome::Failed { reason, .. } => assert!(reason.contains("timed out")),
        other => panic!("expected a failed source, got {:?}", other),
    }

    Ok(())
}
