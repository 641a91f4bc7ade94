// Integration tests for Hot Picks
// These tests drive the full pipeline against fixture pages instead of a browser

pub mod extraction_tests;
pub mod pipeline_tests;

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use hot_picks::{
    AppConfig, AppError, Orchestrator,
    models::Market,
    plugins::NotifierPlugin,
    scraper::PageFetcher,
};

pub const MOVERS_SHAKERS_US: &str = include_str!("../fixtures/movers_shakers_us.html");
pub const BEST_SELLERS_US: &str = include_str!("../fixtures/best_sellers_us.html");

/// Serves canned pages by URL. Unknown URLs behave like a navigation timeout.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> hot_picks::Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Scraping(format!("Navigation to {} timed out", url)))
    }
}

/// Built-in configuration, unaffected by the environment of the test process.
pub fn get_test_config() -> AppConfig {
    let mut config = AppConfig::load(None).expect("built-in configuration must load");
    config.notifications.feishu.webhook_url = None;
    config.report.report_url = "https://reports.example.com/latest.html".to_string();
    config
}

pub fn market<'a>(config: &'a AppConfig, key: &str) -> &'a Market {
    config
        .markets
        .iter()
        .find(|m| m.key == key)
        .expect("market present in built-in configuration")
}

pub fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

pub fn create_orchestrator(
    config: &AppConfig,
    output_dir: &Path,
    notifier: Option<Arc<dyn NotifierPlugin>>,
) -> Orchestrator {
    Orchestrator::new(config, notifier)
        .expect("orchestrator from test configuration")
        .with_output_dir(output_dir.to_path_buf())
}

/// A movers page in the storefront's markup. `None` growth renders the item
/// without a percentage badge, the way newly ranked items appear.
pub fn movers_page(items: &[(&str, &str, Option<&str>)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (name, price, growth))| {
            let growth = growth
                .map(|g| format!(r#"<span class="a-size-small a-color-success">{}</span>"#, g))
                .unwrap_or_default();
            format!(
                r#"<div data-asin="B0TEST{i:04}"><a class="a-link-normal" href="/dp/B0TEST{i:04}"><span class="a-size-base-plus">{name}</span></a>{growth}<span class="a-price"><span class="a-offscreen">{price}</span></span></div>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", body)
}

pub fn best_sellers_page(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (name, price))| {
            format!(
                r#"<div data-asin="B0BEST{i:04}"><a class="a-link-normal" href="/dp/B0BEST{i:04}"><span>{name}</span></a><span class="a-price"><span class="a-offscreen">{price}</span></span></div>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", body)
}
