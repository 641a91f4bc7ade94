use serde::{Deserialize, Serialize};

use crate::models::{ListingSource, Market};
use crate::utils::text::truncate_chars;

/// Longest product name kept, in characters.
pub const MAX_NAME_CHARS: usize = 80;
/// Names must be strictly longer than this to be kept.
pub const MIN_NAME_CHARS: usize = 5;

/// Growth marker for products that have just entered a listing.
pub const NEWLY_LISTED: &str = "新进榜";
/// Name used when no name element is found. Shorter than `MIN_NAME_CHARS`, so
/// such items never survive extraction.
pub const UNKNOWN_NAME: &str = "未知商品";
/// Price used when no price element is found.
pub const UNKNOWN_PRICE: &str = "价格待定";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,
    /// Raw vendor formatting, never parsed.
    pub price: String,
    /// Percentage (`+120%`), rank label (`#3 热销`) or `NEWLY_LISTED`.
    pub growth: String,
    pub market: String,
    pub flag: String,
    pub source: ListingSource,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub growth: String,
    pub source: ListingSource,
}

impl Product {
    /// Build a record for `market`, or `None` when the name is too short to keep.
    pub fn new(new_product: NewProduct, market: &Market) -> Option<Self> {
        let name = new_product.name.trim();
        if name.chars().count() <= MIN_NAME_CHARS {
            return None;
        }

        Some(Self {
            name: truncate_chars(name, MAX_NAME_CHARS),
            price: new_product.price,
            growth: new_product.growth,
            market: market.name.clone(),
            flag: market.flag.clone(),
            source: new_product.source,
        })
    }

    /// `🇺🇸 美国` style label used by the report and the notification card.
    pub fn market_label(&self) -> String {
        format!("{} {}", self.flag, self.market)
    }
}
