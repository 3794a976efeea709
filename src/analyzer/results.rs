//! Aggregate produced by a multi-product analysis

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::lifecycle::{EolStatus, ProductVersionInfo};
use crate::registry::error::RegistryError;

/// A product whose registry lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFailure {
    pub product: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ProductFailure {
    pub fn from_error(product: &str, error: &RegistryError) -> Self {
        Self {
            product: product.to_string(),
            message: error.to_string(),
            status_code: error.status_code(),
        }
    }
}

/// Result of checking a set of products.
///
/// Field names are the serialized contract consumed by report and notification
/// tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResults {
    pub eol_detected: bool,
    pub approaching_eol: bool,
    pub stale_detected: bool,
    pub discontinued_detected: bool,
    pub total_products_checked: usize,
    pub total_cycles_checked: usize,
    pub products: Vec<ProductVersionInfo>,
    pub eol_products: Vec<ProductVersionInfo>,
    pub approaching_eol_products: Vec<ProductVersionInfo>,
    pub stale_products: Vec<ProductVersionInfo>,
    pub discontinued_products: Vec<ProductVersionInfo>,
    pub extended_support_products: Vec<ProductVersionInfo>,
    pub latest_versions: IndexMap<String, String>,
    pub failures: Vec<ProductFailure>,
    pub summary: String,
}

impl ActionResults {
    /// Partition classified entries into the report buckets
    pub fn build(
        total_products: usize,
        entries: Vec<ProductVersionInfo>,
        latest_versions: IndexMap<String, String>,
        failures: Vec<ProductFailure>,
        stale_threshold_days: i64,
    ) -> Self {
        let eol_products = select(&entries, |e| e.status == EolStatus::EndOfLife);
        let approaching_eol_products = select(&entries, |e| e.status == EolStatus::ApproachingEol);
        let stale_products = select(&entries, |e| e.is_stale(stale_threshold_days));
        let discontinued_products = select(&entries, |e| e.is_discontinued);
        let extended_support_products = select(&entries, |e| e.has_extended_support);

        let counts = SummaryCounts {
            products: total_products,
            cycles: entries.len(),
            end_of_life: eol_products.len(),
            approaching_eol: approaching_eol_products.len(),
            stale: stale_products.len(),
            discontinued: discontinued_products.len(),
            unknown: entries
                .iter()
                .filter(|e| e.status == EolStatus::Unknown)
                .count(),
            failed: failures.len(),
        };

        Self {
            eol_detected: !eol_products.is_empty(),
            approaching_eol: !approaching_eol_products.is_empty(),
            stale_detected: !stale_products.is_empty(),
            discontinued_detected: !discontinued_products.is_empty(),
            total_products_checked: total_products,
            total_cycles_checked: entries.len(),
            summary: generate_summary(&counts),
            products: entries,
            eol_products,
            approaching_eol_products,
            stale_products,
            discontinued_products,
            extended_support_products,
            latest_versions,
            failures,
        }
    }
}

fn select(
    entries: &[ProductVersionInfo],
    pred: impl Fn(&ProductVersionInfo) -> bool,
) -> Vec<ProductVersionInfo> {
    entries.iter().filter(|e| pred(e)).cloned().collect()
}

/// Counts the summary line is built from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub products: usize,
    pub cycles: usize,
    pub end_of_life: usize,
    pub approaching_eol: usize,
    pub stale: usize,
    pub discontinued: usize,
    pub unknown: usize,
    pub failed: usize,
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// One-line human readable summary, a pure function of the counts
pub fn generate_summary(counts: &SummaryCounts) -> String {
    let mut findings = Vec::new();
    if counts.end_of_life > 0 {
        findings.push(format!("{} end-of-life", counts.end_of_life));
    }
    if counts.approaching_eol > 0 {
        findings.push(format!("{} approaching end-of-life", counts.approaching_eol));
    }
    if counts.stale > 0 {
        findings.push(format!("{} stale", counts.stale));
    }
    if counts.discontinued > 0 {
        findings.push(format!("{} discontinued", counts.discontinued));
    }
    if counts.unknown > 0 {
        findings.push(format!("{} unknown", counts.unknown));
    }
    if counts.failed > 0 {
        findings.push(format!("{} failed to load", plural(counts.failed, "product")));
    }

    let checked = format!(
        "Checked {} across {}",
        plural(counts.cycles, "release cycle"),
        plural(counts.products, "product")
    );

    if findings.is_empty() && counts.cycles == 0 {
        format!("{checked}: nothing to report")
    } else if findings.is_empty() {
        format!("{checked}: all actively supported")
    } else {
        format!("{checked}: {}", findings.join(", "))
    }
}
