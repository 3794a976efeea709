//! Lifecycle analysis of products and their release cycles
//!
//! - [`lifecycle`]: decoding of milestone fields and per-cycle classification
//! - [`results`]: the aggregate handed to report and notification tooling

pub mod lifecycle;
pub mod results;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_STALE_THRESHOLD_DAYS, FailurePolicy, ProductCycles};
use crate::registry::error::RegistryError;
use crate::registry::source::CycleSource;
use crate::registry::types::Cycle;
use crate::version::clean_version;
use crate::version::semver::highest_version;

pub use lifecycle::{EolStatus, LifecycleField, ProductVersionInfo};
pub use results::{ActionResults, ProductFailure};

/// Cycle identifier used for an `unknown` entry when nothing more specific was requested
const UNRESOLVED_CYCLE: &str = "unknown";

/// Entries and newest known release of one product
struct ProductReport {
    entries: Vec<ProductVersionInfo>,
    latest_version: Option<String>,
}

/// Classifies release cycles fetched from a [`CycleSource`]
pub struct EolAnalyzer {
    source: Arc<dyn CycleSource>,
    eol_threshold_days: i64,
    stale_threshold_days: i64,
    failure_policy: FailurePolicy,
    reference_date: Option<NaiveDate>,
}

impl EolAnalyzer {
    pub fn new(source: Arc<dyn CycleSource>, eol_threshold_days: i64) -> Self {
        Self {
            source,
            eol_threshold_days,
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
            failure_policy: FailurePolicy::default(),
            reference_date: None,
        }
    }

    pub fn with_stale_threshold_days(mut self, days: i64) -> Self {
        self.stale_threshold_days = days;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Classify as of `date` instead of the current UTC day
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Classify a single cycle of a product
    pub fn analyze_product_cycle(&self, product: &str, cycle: &Cycle) -> ProductVersionInfo {
        ProductVersionInfo::classify(product, cycle, self.today(), self.eol_threshold_days)
    }

    /// Classify the cycles of one product.
    ///
    /// With `specific_cycles` only those identifiers are kept; requested
    /// identifiers the registry does not know are skipped.
    pub async fn analyze_product(
        &self,
        product: &str,
        specific_cycles: Option<&[String]>,
    ) -> Result<Vec<ProductVersionInfo>, RegistryError> {
        let report = self
            .check_product(self.today(), product, specific_cycles, None, false)
            .await?;
        Ok(report.entries)
    }

    /// Classify many products and aggregate the results.
    ///
    /// Products are fetched concurrently; entries keep the order of `products`.
    /// A product found in `version_map` is resolved through its version instead
    /// of `cycles_map`. A registry failure only affects its own product.
    pub async fn analyze_products(
        &self,
        products: &[String],
        cycles_map: Option<&ProductCycles>,
        version_map: Option<&IndexMap<String, String>>,
        semantic_fallback: bool,
    ) -> ActionResults {
        let today = self.today();

        let checks = products.iter().map(|product| {
            let specific = cycles_map
                .and_then(|m| m.get(product))
                .map(Vec::as_slice);
            let version = version_map
                .and_then(|m| m.get(product))
                .map(String::as_str);
            async move {
                let outcome = self
                    .check_product(today, product, specific, version, semantic_fallback)
                    .await;
                (product, specific, version, outcome)
            }
        });

        let mut entries = Vec::new();
        let mut latest_versions = IndexMap::new();
        let mut failures = Vec::new();

        for (product, specific, version, outcome) in join_all(checks).await {
            match outcome {
                Ok(report) => {
                    entries.extend(report.entries);
                    if let Some(latest) = report.latest_version {
                        latest_versions.insert(product.clone(), latest);
                    }
                }
                Err(e) => {
                    warn!("Failed to analyze {}: {}", product, e);
                    failures.push(ProductFailure::from_error(product, &e));
                    if self.failure_policy == FailurePolicy::Unknown {
                        entries.extend(
                            unresolved_cycles(specific, version)
                                .iter()
                                .map(|cycle| ProductVersionInfo::unknown(product, cycle)),
                        );
                    }
                }
            }
        }

        let results = ActionResults::build(
            products.len(),
            entries,
            latest_versions,
            failures,
            self.stale_threshold_days,
        );
        info!("{}", results.summary);
        results
    }

    async fn check_product(
        &self,
        today: NaiveDate,
        product: &str,
        specific_cycles: Option<&[String]>,
        version: Option<&str>,
        semantic_fallback: bool,
    ) -> Result<ProductReport, RegistryError> {
        let cycles = self.source.product_cycles(product).await?;
        let latest_version = highest_version(cycles.iter().filter_map(|c| c.latest.as_deref()))
            .map(str::to_string);

        let selected: Vec<Cycle> = match version {
            Some(version) => {
                match self
                    .source
                    .cycle_for_version(product, version, semantic_fallback)
                    .await?
                {
                    Some(cycle) => vec![cycle],
                    None => {
                        warn!("No {} cycle matches version {}", product, version);
                        Vec::new()
                    }
                }
            }
            None => select_cycles(product, cycles, specific_cycles),
        };

        let entries = selected
            .iter()
            .map(|cycle| {
                ProductVersionInfo::classify(product, cycle, today, self.eol_threshold_days)
            })
            .collect::<Vec<_>>();
        debug!("Classified {} cycles of {}", entries.len(), product);

        Ok(ProductReport {
            entries,
            latest_version,
        })
    }
}

/// Keep the requested cycles in registry order; `None` or an empty request keeps all
fn select_cycles(product: &str, cycles: Vec<Cycle>, requested: Option<&[String]>) -> Vec<Cycle> {
    let Some(requested) = requested.filter(|r| !r.is_empty()) else {
        return cycles;
    };

    for wanted in requested {
        if !cycles.iter().any(|c| c.cycle == *wanted) {
            warn!("Cycle {} of {} is not tracked, skipping", wanted, product);
        }
    }

    cycles
        .into_iter()
        .filter(|c| requested.contains(&c.cycle))
        .collect()
}

/// Cycle identifiers to report as `unknown` for a product that failed
fn unresolved_cycles(specific: Option<&[String]>, version: Option<&str>) -> Vec<String> {
    if let Some(version) = version {
        return vec![clean_version(version)];
    }
    match specific {
        Some(cycles) if !cycles.is_empty() => cycles.to_vec(),
        _ => vec![UNRESOLVED_CYCLE.to_string()],
    }
}
