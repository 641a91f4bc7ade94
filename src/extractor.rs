use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::{ListingSelectors, SelectorsConfig};
use crate::models::{ListingSource, Market, NewProduct, Product, NEWLY_LISTED, UNKNOWN_NAME, UNKNOWN_PRICE};
use crate::utils::error::{AppError, Result};
use crate::utils::text::normalize_whitespace;

/// Compiled selectors for one listing page.
#[derive(Debug, Clone)]
struct CompiledListing {
    item: Selector,
    max_items: usize,
    name: Vec<Selector>,
    price: Vec<Selector>,
    growth: Vec<Selector>,
}

impl CompiledListing {
    fn compile(selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            item: compile_selector(&selectors.item)?,
            max_items: selectors.max_items,
            name: compile_selectors(&selectors.name)?,
            price: compile_selectors(&selectors.price)?,
            growth: compile_selectors(&selectors.growth)?,
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!("Failed to compile selector '{}': {:?}", selector, e);
        AppError::InvalidSelector {
            selector: selector.to_string(),
        }
    })
}

fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors.iter().map(|s| compile_selector(s)).collect()
}

/// Text of the first fallback selector that yields something non-empty.
fn first_text(item: &ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        item.select(selector)
            .map(|element| normalize_whitespace(&element.text().collect::<String>()))
            .find(|text| !text.is_empty())
    })
}

/// Turns rendered listing pages into product records.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    movers_shakers: CompiledListing,
    best_sellers: CompiledListing,
}

impl ListingExtractor {
    pub fn new(config: &SelectorsConfig) -> Result<Self> {
        Ok(Self {
            movers_shakers: CompiledListing::compile(&config.movers_shakers)?,
            best_sellers: CompiledListing::compile(&config.best_sellers)?,
        })
    }

    fn listing(&self, source: ListingSource) -> &CompiledListing {
        match source {
            ListingSource::MoversShakers => &self.movers_shakers,
            ListingSource::BestSellers => &self.best_sellers,
        }
    }

    /// Extract up to the listing's `max_items` products from `html`.
    ///
    /// Items whose name is missing or too short are skipped. Missing prices
    /// and growth signals fall back to placeholders.
    pub fn extract(&self, html: &str, source: ListingSource, market: &Market) -> Vec<Product> {
        let document = Html::parse_document(html);
        let listing = self.listing(source);
        let mut products = Vec::new();

        for (index, item) in document.select(&listing.item).take(listing.max_items).enumerate() {
            let name = first_text(&item, &listing.name).unwrap_or_else(|| UNKNOWN_NAME.to_string());
            let price = first_text(&item, &listing.price).unwrap_or_else(|| UNKNOWN_PRICE.to_string());
            let growth = match source {
                ListingSource::MoversShakers => first_text(&item, &listing.growth)
                    .filter(|text| text.contains('%'))
                    .unwrap_or_else(|| NEWLY_LISTED.to_string()),
                // Position on the page, counting skipped items
                ListingSource::BestSellers => format!("#{} 热销", index + 1),
            };

            let new_product = NewProduct {
                name,
                price,
                growth,
                source,
            };

            match Product::new(new_product, market) {
                Some(product) => products.push(product),
                None => debug!(market = %market.key, %source, index, "Skipping item without a usable name"),
            }
        }

        products
    }
}
