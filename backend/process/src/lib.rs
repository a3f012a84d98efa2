//! # Dataset Processing
//!
//! Offline pass over `data/catalog.json`, run after every hand edit and
//! before deployment. The server trusts whatever it loads, so the
//! invariants live here, at write time.
//!
//! ## Checks
//!
//! Fatal (dataset is not written):
//! - more than one catalog marked current
//! - duplicate catalog ids, duplicate category ids within a catalog,
//!   duplicate sub-category ids within a category, duplicate product ids
//!
//! Warnings (reported, dataset still written):
//! - no catalog marked current
//! - products referencing unknown category or sub-category ids
//!
//! ## Normalization
//!
//! Display names get trimmed, control characters stripped and internal
//! whitespace collapsed. Ids are left untouched, the frontend links by
//! them.

use std::fs;

use anyhow::{bail, Context, Result};
use catalog::Dataset;

pub mod utils;

use utils::{check_dataset, normalize_dataset};

pub fn run(input: &str, output: Option<&str>) -> Result<()> {
    let raw = fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?;
    let mut dataset: Dataset =
        serde_json::from_str(&raw).with_context(|| format!("malformed dataset in {input}"))?;

    normalize_dataset(&mut dataset);

    let report = check_dataset(&dataset);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }

    if !report.errors.is_empty() {
        bail!("{} fatal findings, dataset not written", report.errors.len());
    }

    let out = output.unwrap_or(input);
    let pretty = serde_json::to_string_pretty(&dataset)?;
    fs::write(out, pretty + "\n").with_context(|| format!("failed to write {out}"))?;

    println!("Catalogs: {}", dataset.catalogs.len());
    println!("Products: {}", dataset.products.len());
    println!("Wrote normalized dataset to {out}");

    Ok(())
}
