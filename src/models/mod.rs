use serde::{Deserialize, Serialize};
use std::fmt;

pub mod market;
pub mod product;

// Re-exports for convenience
pub use market::*;
pub use product::*;

/// Which storefront listing a record was scraped from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    MoversShakers,
    BestSellers,
}

impl ListingSource {
    /// Visit order within a market.
    pub const ALL: [ListingSource; 2] = [ListingSource::MoversShakers, ListingSource::BestSellers];

    pub fn label(&self) -> &'static str {
        match self {
            ListingSource::MoversShakers => "Movers & Shakers",
            ListingSource::BestSellers => "Best Sellers",
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
