//! Free-text narrowing of a product list.
//!
//! Stable filter: keeps the input ordering, drops non-matches. The match is
//! a case-insensitive substring check against name and description, which
//! is all the product search box on the site does.

use crate::model::Product;

/// Narrows `products` to the ones matching `query`. An absent, empty or
/// whitespace-only query returns the input unchanged.
pub fn filter_products<'a>(products: Vec<&'a Product>, query: Option<&str>) -> Vec<&'a Product> {
    let query = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return products,
    };

    products
        .into_iter()
        .filter(|p| matches_query(p, &query))
        .collect()
}

fn matches_query(product: &Product, query: &str) -> bool {
    if product.name.to_lowercase().contains(query) {
        return true;
    }

    product
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(query))
}
