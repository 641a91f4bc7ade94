use serde::{Deserialize, Serialize};

use crate::models::ListingSource;

/// A regional storefront and its two listing pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Market {
    pub key: String,
    /// Display name, e.g. `美国`.
    pub name: String,
    pub flag: String,
    pub movers_shakers: String,
    pub best_sellers: String,
}

impl Market {
    pub fn listing_url(&self, source: ListingSource) -> &str {
        match source {
            ListingSource::MoversShakers => &self.movers_shakers,
            ListingSource::BestSellers => &self.best_sellers,
        }
    }
}
