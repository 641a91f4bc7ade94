use std::num::IntErrorKind;

use crate::models::{Product, NEWLY_LISTED};

/// How many ranked products make it into the report.
pub const TOP_PRODUCTS: usize = 10;

const MALFORMED_PERCENT_KEY: f64 = 0.5;
const RANK_LABEL_KEY: f64 = 0.8;

/// Parse a growth string such as `+120%` into its integer magnitude.
///
/// Returns `None` when the text has no `%` or the rest is not an integer.
/// Magnitudes beyond `i64` saturate, so they still outrank smaller gains.
pub fn parse_growth_percent(growth: &str) -> Option<i64> {
    if !growth.contains('%') {
        return None;
    }

    match growth.replace(['%', '+'], "").trim().parse::<i64>() {
        Ok(magnitude) => Some(magnitude),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Sort key for a growth signal; lower sorts first.
pub fn priority_key(growth: &str) -> f64 {
    if growth == NEWLY_LISTED {
        0.0
    } else if growth.contains('%') {
        parse_growth_percent(growth)
            .map(|magnitude| 1.0 - magnitude as f64 / 1000.0)
            .unwrap_or(MALFORMED_PERCENT_KEY)
    } else {
        RANK_LABEL_KEY
    }
}

/// Stable sort by ascending priority key.
pub fn rank(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| priority_key(&a.growth).total_cmp(&priority_key(&b.growth)));
    products
}

/// `rank` then keep the first `TOP_PRODUCTS`.
pub fn top_products(products: Vec<Product>) -> Vec<Product> {
    let mut ranked = rank(products);
    ranked.truncate(TOP_PRODUCTS);
    ranked
}
