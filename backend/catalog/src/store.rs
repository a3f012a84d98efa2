//! # Dataset Store
//!
//! In-memory read accessor over the static catalog dataset.
//!
//! ## Requirements
//!
//! - Load once, never mutate. Writes happen offline through the `process`
//!   tool against the JSON file.
//! - Lookups with an unknown id return an empty list, never an error. The
//!   only single-resource lookup is the current catalog, which is simply
//!   absent when nothing is marked current.
//! - At most one catalog may be marked current. A snapshot with two is a
//!   data bug and is rejected at load instead of letting the API pick one
//!   arbitrarily.

use std::collections::HashSet;
use std::{fs, path::Path};

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::model::{Catalog, Category, Dataset, Product, SubCategory};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{count} catalogs marked current, expected at most one")]
    MultipleCurrent { count: usize },
}

/// Entity counts for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub catalogs: usize,
    pub categories: usize,
    pub sub_categories: usize,
    pub products: usize,
}

pub struct CatalogStore {
    dataset: Dataset,
}

impl CatalogStore {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path)?;

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(raw)?;

        Self::new(dataset)
    }

    pub fn new(dataset: Dataset) -> Result<Self, DatasetError> {
        let current = dataset.catalogs.iter().filter(|c| c.is_current).count();
        if current > 1 {
            return Err(DatasetError::MultipleCurrent { count: current });
        }

        let store = Self { dataset };
        store.report_dangling_references();

        Ok(store)
    }

    pub fn current_catalog(&self) -> Option<&Catalog> {
        self.dataset.catalogs.iter().find(|c| c.is_current)
    }

    /// All categories in dataset order across catalogs.
    pub fn categories(&self) -> Vec<&Category> {
        self.dataset
            .catalogs
            .iter()
            .flat_map(|c| c.categories.iter())
            .collect()
    }

    /// Sub-categories, optionally narrowed to one parent category. An
    /// unknown category id yields an empty list.
    pub fn sub_categories(&self, category: Option<&str>) -> Vec<&SubCategory> {
        self.categories()
            .into_iter()
            .filter(|c| category.is_none_or(|id| c.id == id))
            .flat_map(|c| c.sub_categories.iter())
            .collect()
    }

    /// Products, optionally narrowed by category and/or sub-category id.
    pub fn products(&self, category: Option<&str>, sub_category: Option<&str>) -> Vec<&Product> {
        self.dataset
            .products
            .iter()
            .filter(|p| category.is_none_or(|id| p.category == id))
            .filter(|p| sub_category.is_none_or(|id| p.sub_category == id))
            .collect()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            catalogs: self.dataset.catalogs.len(),
            categories: self.categories().len(),
            sub_categories: self.sub_categories(None).len(),
            products: self.dataset.products.len(),
        }
    }

    fn report_dangling_references(&self) {
        let category_ids: HashSet<&str> =
            self.categories().iter().map(|c| c.id.as_str()).collect();
        let sub_category_ids: HashSet<&str> = self
            .sub_categories(None)
            .iter()
            .map(|s| s.id.as_str())
            .collect();

        for product in &self.dataset.products {
            if !category_ids.contains(product.category.as_str()) {
                warn!(
                    product = %product.id,
                    category = %product.category,
                    "product references unknown category"
                );
            }
            if !sub_category_ids.contains(product.sub_category.as_str()) {
                warn!(
                    product = %product.id,
                    sub_category = %product.sub_category,
                    "product references unknown sub-category"
                );
            }
        }
    }
}
