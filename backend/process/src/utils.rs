use std::collections::HashSet;

use catalog::Dataset;
use regex::Regex;

#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn normalize_dataset(dataset: &mut Dataset) {
    for catalog in &mut dataset.catalogs {
        catalog.name = normalize(&catalog.name);
        for category in &mut catalog.categories {
            category.name = normalize(&category.name);
            for sub_category in &mut category.sub_categories {
                sub_category.name = normalize(&sub_category.name);
            }
        }
    }

    for product in &mut dataset.products {
        product.name = normalize(&product.name);
        if let Some(description) = &product.description {
            product.description = Some(normalize(description));
        }
    }
}

/// Cleans a display name: control characters out, whitespace runs
/// collapsed, ends trimmed. Case is kept, these are shown to customers.
pub fn normalize(input: &str) -> String {
    let strip = Regex::new(r"[\x00-\x1f\x7f]").unwrap();
    let s = strip.replace_all(input, " ").into_owned();

    let collapse = Regex::new(r"\s+").unwrap();
    collapse.replace_all(&s, " ").trim().to_string()
}

pub fn check_dataset(dataset: &Dataset) -> Report {
    let mut report = Report::default();

    check_current_flags(dataset, &mut report);
    check_duplicate_ids(dataset, &mut report);
    check_references(dataset, &mut report);

    report
}

fn check_current_flags(dataset: &Dataset, report: &mut Report) {
    let current: Vec<&str> = dataset
        .catalogs
        .iter()
        .filter(|c| c.is_current)
        .map(|c| c.id.as_str())
        .collect();

    match current.len() {
        0 => report
            .warnings
            .push("no catalog is marked current".to_string()),
        1 => {}
        _ => report.errors.push(format!(
            "{} catalogs marked current: {}",
            current.len(),
            current.join(", ")
        )),
    }
}

fn check_duplicate_ids(dataset: &Dataset, report: &mut Report) {
    let mut catalog_ids = HashSet::new();
    for catalog in &dataset.catalogs {
        if !catalog_ids.insert(catalog.id.as_str()) {
            report
                .errors
                .push(format!("duplicate catalog id {}", catalog.id));
        }

        let mut category_ids = HashSet::new();
        for category in &catalog.categories {
            if !category_ids.insert(category.id.as_str()) {
                report.errors.push(format!(
                    "duplicate category id {} in catalog {}",
                    category.id, catalog.id
                ));
            }

            let mut sub_category_ids = HashSet::new();
            for sub_category in &category.sub_categories {
                if !sub_category_ids.insert(sub_category.id.as_str()) {
                    report.errors.push(format!(
                        "duplicate sub-category id {} in category {}",
                        sub_category.id, category.id
                    ));
                }
            }
        }
    }

    let mut product_ids = HashSet::new();
    for product in &dataset.products {
        if !product_ids.insert(product.id.as_str()) {
            report
                .errors
                .push(format!("duplicate product id {}", product.id));
        }
    }
}

fn check_references(dataset: &Dataset, report: &mut Report) {
    let category_ids: HashSet<&str> = dataset
        .catalogs
        .iter()
        .flat_map(|c| c.categories.iter())
        .map(|c| c.id.as_str())
        .collect();
    let sub_category_ids: HashSet<&str> = dataset
        .catalogs
        .iter()
        .flat_map(|c| c.categories.iter())
        .flat_map(|c| c.sub_categories.iter())
        .map(|s| s.id.as_str())
        .collect();

    for product in &dataset.products {
        if !category_ids.contains(product.category.as_str()) {
            report.warnings.push(format!(
                "product {} references unknown category {}",
                product.id, product.category
            ));
        }
        if !sub_category_ids.contains(product.sub_category.as_str()) {
            report.warnings.push(format!(
                "product {} references unknown sub-category {}",
                product.id, product.sub_category
            ));
        }
    }
}
