use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Defaults
// =============================================================================

/// Default base URL of the lifecycle registry
pub const DEFAULT_API_URL: &str = "https://endoflife.date/api";

/// Default cache time-to-live in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Default window in days in which an upcoming EOL date counts as approaching
pub const DEFAULT_EOL_THRESHOLD_DAYS: i64 = 90;

/// Default number of days without a release after which a cycle is stale
pub const DEFAULT_STALE_THRESHOLD_DAYS: i64 = 365;

/// Timeout for a single registry request in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cycle identifiers to check, per product
pub type ProductCycles = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration: {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

/// What to record for a product whose registry lookup failed
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record `unknown` entries for the product
    #[default]
    Unknown,
    /// Leave the product out of the entries
    Omit,
}

/// Run configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckConfig {
    /// Comma or newline separated product identifiers
    pub products: String,
    /// JSON object mapping products to the cycles to check
    pub cycles: String,
    /// Explicit version to resolve for the (single) product
    pub version: String,
    pub semantic_version_fallback: bool,
    pub eol_threshold_days: i64,
    pub stale_threshold_days: i64,
    /// Cache time-to-live in seconds
    pub cache_ttl: u64,
    pub api_url: String,
    pub fail_on_eol: bool,
    pub fail_on_approaching_eol: bool,
    pub output_format: OutputFormat,
    pub failure_policy: FailurePolicy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            products: String::new(),
            cycles: String::new(),
            version: String::new(),
            semantic_version_fallback: true,
            eol_threshold_days: DEFAULT_EOL_THRESHOLD_DAYS,
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            api_url: DEFAULT_API_URL.to_string(),
            fail_on_eol: false,
            fail_on_approaching_eol: false,
            output_format: OutputFormat::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Validated, ready-to-run form of [`CheckConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct CheckPlan {
    pub products: Vec<String>,
    pub cycles: ProductCycles,
    pub versions: IndexMap<String, String>,
}

impl CheckConfig {
    /// Load a config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Check the configuration and parse its list inputs.
    ///
    /// Runs before any network activity; the first problem found is returned.
    pub fn validate(&self) -> Result<CheckPlan, ValidationError> {
        let products = parse_products(&self.products);
        if products.is_empty() {
            return Err(ValidationError::new(
                "products",
                "at least one product is required",
            ));
        }

        if self.eol_threshold_days < 0 {
            return Err(ValidationError::new(
                "eolThresholdDays",
                format!("must not be negative, got {}", self.eol_threshold_days),
            ));
        }

        if self.stale_threshold_days < 0 {
            return Err(ValidationError::new(
                "staleThresholdDays",
                format!("must not be negative, got {}", self.stale_threshold_days),
            ));
        }

        match reqwest::Url::parse(&self.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ValidationError::new(
                    "apiUrl",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            Err(e) => return Err(ValidationError::new("apiUrl", e.to_string())),
        }

        let cycles = parse_cycles(&self.cycles)?;

        let version = self.version.trim();
        let mut versions = IndexMap::new();
        if !version.is_empty() {
            if products.len() != 1 {
                return Err(ValidationError::new(
                    "version",
                    "a version can only be checked for exactly one product",
                ));
            }
            versions.insert(products[0].clone(), version.to_string());
        }

        Ok(CheckPlan {
            products,
            cycles,
            versions,
        })
    }
}

/// Split a product list on commas and newlines.
///
/// Entries are trimmed; empty entries and repeats are dropped, keeping the first
/// occurrence.
pub fn parse_products(input: &str) -> Vec<String> {
    let mut products: Vec<String> = Vec::new();
    for product in input.split([',', '\n']).map(str::trim) {
        if !product.is_empty() && !products.iter().any(|p| p == product) {
            products.push(product.to_string());
        }
    }
    products
}

/// Parse a `{"product": ["cycle", ...]}` object. Numeric cycles become strings.
pub fn parse_cycles(input: &str) -> Result<ProductCycles, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(ProductCycles::new());
    }

    let raw: IndexMap<String, Vec<serde_json::Value>> = serde_json::from_str(input)
        .map_err(|e| ValidationError::new("cycles", format!("expected a JSON object: {e}")))?;

    raw.into_iter()
        .map(|(product, cycles)| -> Result<(String, Vec<String>), ValidationError> {
            let cycles = cycles
                .into_iter()
                .map(|cycle| match cycle {
                    serde_json::Value::String(s) => Ok(s.trim().to_string()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    other => Err(ValidationError::new(
                        "cycles",
                        format!("cycle for '{product}' must be a string or number, got {other}"),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((product.trim().to_string(), cycles))
        })
        .collect()
}
