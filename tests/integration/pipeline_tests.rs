use super::*;
use hot_picks::models::NEWLY_LISTED;
use hot_picks::orchestrator::NotificationStatus;

fn scenario_a_fetcher(config: &AppConfig) -> FixtureFetcher {
    let usa = market(config, "usa");
    FixtureFetcher::new()
        .with_page(
            &usa.movers_shakers,
            movers_page(&[
                ("Wireless Bluetooth Earbuds Pro", "$39.99", None),
                ("Kitchen Food Scale Digital", "$15.99", Some("+85%")),
            ]),
        )
        .with_page(
            &usa.best_sellers,
            best_sellers_page(&[("Mini", "$1.00"), ("Yoga Dumbbell Set", "$45.00")]),
        )
}

/// Text of the first card's icon slot.
fn first_icon(html: &str) -> Option<&str> {
    html.split("<div class=\"product-icon\">")
        .nth(1)
        .and_then(|rest| rest.split("</div>").next())
}

#[tokio::test]
async fn test_ranked_report_from_scraped_pages() -> anyhow::Result<()> {
    let config = get_test_config();
    let dir = tempfile::tempdir()?;
    let orchestrator = create_orchestrator(&config, dir.path(), None);

    let summary = orchestrator
        .run_at(Arc::new(scenario_a_fetcher(&config)), generated_at())
        .await?;

    let ranked: Vec<(&str, &str)> = summary
        .top_products
        .iter()
        .map(|p| (p.name.as_str(), p.growth.as_str()))
        .collect();
    // Keys 0, 0.8 and 0.915, lowest first
    assert_eq!(
        ranked,
        vec![
            ("Wireless Bluetooth Earbuds Pro", NEWLY_LISTED),
            ("Yoga Dumbbell Set", "#2 热销"),
            ("Kitchen Food Scale Digital", "+85%"),
        ]
    );
    assert_eq!(summary.products_collected, 3);
    assert_eq!(summary.sources.len(), 6);
    assert_eq!(summary.sources_succeeded(), 2);

    let html = std::fs::read_to_string(&summary.report.latest)?;
    assert_eq!(first_icon(&html), Some("🎧"));
    assert!(html.contains("width: 85%"));
    assert!(html.contains("width: 80%"));
    assert!(html.contains("width: 75%"));
    assert!(html.contains("<div class=\"stat-value\">3</div>"));
    assert!(html.contains("<div class=\"stat-value\">+85%</div>"));
    assert!(html.contains("🔥 Movers &amp; Shakers"));

    Ok(())
}

#[tokio::test]
async fn test_empty_run_still_writes_report() -> anyhow::Result<()> {
    let config = get_test_config();
    let dir = tempfile::tempdir()?;
    let orchestrator = create_orchestrator(&config, dir.path(), None);

    let summary = orchestrator.run_at(Arc::new(FixtureFetcher::new()), generated_at()).await?;

    assert_eq!(summary.products_collected, 0);
    assert!(summary.top_products.is_empty());
    assert_eq!(summary.sources_succeeded(), 0);
    assert!(summary.sources.iter().all(|s| !s.is_success()));

    let html = std::fs::read_to_string(&summary.report.dated)?;
    assert_eq!(html.matches("class=\"product-card\"").count(), 0);
    assert!(html.contains("<div class=\"stat-value\">0</div>"));
    assert!(html.contains(&format!("<div class=\"stat-value\">{}</div>", NEWLY_LISTED)));

    Ok(())
}

#[tokio::test]
async fn test_without_webhook_notification_is_skipped() -> anyhow::Result<()> {
    let config = get_test_config();
    let dir = tempfile::tempdir()?;
    let output_dir = dir.path().join("reports");
    let orchestrator = create_orchestrator(&config, &output_dir, None);

    let summary = orchestrator
        .run_at(Arc::new(scenario_a_fetcher(&config)), generated_at())
        .await?;

    assert_eq!(summary.notification, NotificationStatus::Skipped);
    assert_eq!(summary.report.dated, output_dir.join("hot_products_20261019.html"));
    assert_eq!(summary.report.latest, output_dir.join("latest.html"));

    let dated = std::fs::read_to_string(&summary.report.dated)?;
    let latest = std::fs::read_to_string(&summary.report.latest)?;
    assert_eq!(dated, latest);
    assert!(dated.contains("生成时间：2026-10-19 08:00"));

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_reports() -> anyhow::Result<()> {
    let config = get_test_config();
    let first_dir = tempfile::tempdir()?;
    let second_dir = tempfile::tempdir()?;

    let first = create_orchestrator(&config, first_dir.path(), None)
        .run_at(Arc::new(scenario_a_fetcher(&config)), generated_at())
        .await?;
    let second = create_orchestrator(&config, second_dir.path(), None)
        .run_at(Arc::new(scenario_a_fetcher(&config)), generated_at())
        .await?;

    assert_eq!(
        std::fs::read_to_string(&first.report.dated)?,
        std::fs::read_to_string(&second.report.dated)?
    );

    Ok(())
}

#[tokio::test]
async fn test_top_ten_across_markets() -> anyhow::Result<()> {
    let config = get_test_config();
    let dir = tempfile::tempdir()?;

    let names: Vec<String> = (1..=6).map(|i| format!("Glass Water Bottle model {}", i)).collect();
    let mut fetcher = FixtureFetcher::new();
    for (offset, key) in ["usa", "uk", "de"].into_iter().enumerate() {
        let m = market(&config, key);
        let growths: Vec<String> = (0..names.len()).map(|i| format!("+{}%", offset * 100 + i)).collect();
        let items: Vec<(&str, &str, Option<&str>)> = names
            .iter()
            .zip(&growths)
            .map(|(name, growth)| (name.as_str(), "$10.00", Some(growth.as_str())))
            .collect();
        fetcher = fetcher.with_page(&m.movers_shakers, movers_page(&items));
    }

    let summary = create_orchestrator(&config, dir.path(), None)
        .run_at(Arc::new(fetcher), generated_at())
        .await?;

    assert_eq!(summary.products_collected, 18);
    assert_eq!(summary.top_products.len(), 10);
    assert_eq!(summary.top_products[0].growth, "+205%");
    assert_eq!(summary.top_products[0].market, "德国");
    assert!(summary.top_products.iter().all(|p| p.market != "美国"));

    let html = std::fs::read_to_string(&summary.report.latest)?;
    assert_eq!(html.matches("class=\"product-card\"").count(), 10);
    assert!(html.contains("<div class=\"stat-value\">+205%</div>"));

    Ok(())
}
