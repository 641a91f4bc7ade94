use askama::Template;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::advisor::{self, MarketingTips};
use crate::models::{ListingSource, Product, MAX_NAME_CHARS, NEWLY_LISTED};
use crate::ranker::TOP_PRODUCTS;
use crate::utils::error::Result;
use crate::utils::text::truncate_chars;

/// Shown in the header regardless of how many markets are configured.
pub const COVERED_MARKETS: usize = 3;
pub const LATEST_REPORT: &str = "latest.html";

struct ProductCard<'a> {
    rank: usize,
    icon: &'static str,
    market_label: String,
    name: String,
    growth: &'a str,
    price: &'a str,
    source: ListingSource,
    bar_fill: usize,
    tips: &'static MarketingTips,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title_date: String,
    generated_at: String,
    top_count: usize,
    market_count: usize,
    max_growth: &'a str,
    cards: Vec<ProductCard<'a>>,
}

/// Bar width for the card at 1-based `rank`; 85% for the first card, 40% for the tenth.
fn bar_fill(rank: usize) -> usize {
    90usize.saturating_sub(rank * 5)
}

/// Growth of the first product carrying a percentage, else the newly-listed marker.
fn headline_growth(products: &[Product]) -> &str {
    products
        .iter()
        .map(|p| p.growth.as_str())
        .find(|growth| growth.contains('%'))
        .unwrap_or(NEWLY_LISTED)
}

/// Render the HTML report for already-ranked products. Anything past the
/// first `TOP_PRODUCTS` entries is ignored.
pub fn render(products: &[Product], generated_at: NaiveDateTime) -> Result<String> {
    let top = &products[..products.len().min(TOP_PRODUCTS)];

    let cards = top
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let rank = index + 1;
            ProductCard {
                rank,
                icon: advisor::icon_for(&product.name),
                market_label: product.market_label(),
                name: truncate_chars(&product.name, MAX_NAME_CHARS),
                growth: &product.growth,
                price: &product.price,
                source: product.source,
                bar_fill: bar_fill(rank),
                tips: advisor::advise(&product.name),
            }
        })
        .collect();

    let template = ReportTemplate {
        title_date: generated_at.format("%Y-%m-%d").to_string(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        top_count: top.len(),
        market_count: COVERED_MARKETS,
        max_growth: headline_growth(top),
        cards,
    };

    Ok(template.render()?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub dated: PathBuf,
    pub latest: PathBuf,
}

pub fn dated_report_name(date: NaiveDate) -> String {
    format!("hot_products_{}.html", date.format("%Y%m%d"))
}

/// Write `html` to the dated report and the `latest.html` alias under `output_dir`.
pub async fn write_reports(output_dir: &Path, html: &str, date: NaiveDate) -> Result<ReportPaths> {
    tokio::fs::create_dir_all(output_dir).await?;

    let paths = ReportPaths {
        dated: output_dir.join(dated_report_name(date)),
        latest: output_dir.join(LATEST_REPORT),
    };

    tokio::fs::write(&paths.dated, html).await?;
    info!(path = %paths.dated.display(), "Report written");
    tokio::fs::write(&paths.latest, html).await?;
    info!(path = %paths.latest.display(), "Latest report updated");

    Ok(paths)
}
