//! # Catalog Data
//!
//! Shared dataset crate for the gear backend.
//!
//! The catalog lives in a single hand-edited JSON file
//! (`data/catalog.json`), normalized by the `process` tool and loaded here
//! once per process into an immutable snapshot. Everything downstream
//! (category pages, product listings, admin counts) is a read over that
//! snapshot.
//!
//! ## Shape
//!
//! - Catalogs own an ordered list of categories, categories own an ordered
//!   list of sub-categories.
//! - Products sit in a flat list next to the catalogs and point at their
//!   category/sub-category by id. Queries resolve the references, nothing
//!   is nested at the product level.
//! - At most one catalog carries `isCurrent`. The loader refuses a
//!   snapshot that breaks this; zero current catalogs is allowed and shows
//!   up as an empty lookup.

pub mod filter;
pub mod model;
pub mod store;

pub use filter::filter_products;
pub use model::{Catalog, Category, Dataset, Product, SubCategory};
pub use store::{CatalogStore, Counts, DatasetError};
