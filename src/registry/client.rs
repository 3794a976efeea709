//! HTTP client for the lifecycle registry API

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{DEFAULT_API_URL, DEFAULT_CACHE_TTL_SECS, REQUEST_TIMEOUT_SECS};
use crate::registry::cache::{CacheStats, ResponseCache};
use crate::registry::error::{RegistryError, RequestContext};
use crate::registry::source::CycleSource;
use crate::registry::types::{Cycle, ProductDetails, ProductSummary};
use crate::version::{clean_version, get_semantic_fallbacks};

/// Anchor for building request paths; only its path is ever used
static PATH_ANCHOR: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://registry.invalid/").expect("path anchor URL is valid"));

/// Join `segments` into a request path, percent-encoding each one.
///
/// `/` inside a segment is encoded, so a product named `a/b` can never collide
/// with cycle `b` of product `a`. The result doubles as the cache key.
fn encoded_path(segments: &[&str]) -> String {
    let mut url = PATH_ANCHOR.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// Client for the lifecycle registry with a per-instance response cache
pub struct EndOfLifeClient {
    client: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

impl EndOfLifeClient {
    /// Creates a client for `base_url` whose responses stay fresh for `cache_ttl`
    pub fn new(base_url: &str, cache_ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("eol-check/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(cache_ttl),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}`, served from the cache while the entry is fresh.
    ///
    /// The raw JSON is only cached once it decodes into `T`, so a malformed
    /// payload is never memoized.
    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        context: RequestContext,
    ) -> Result<T, RegistryError> {
        if let Some(payload) = self.cache.get(path) {
            return serde_json::from_value(payload).map_err(|e| {
                RegistryError::InvalidResponse {
                    message: e.to_string(),
                    context,
                }
            });
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                RegistryError::network(e, context.clone())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Registry returned status {}: {}", status, url);
            return Err(RegistryError::Status {
                status: status.as_u16(),
                context,
            });
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            warn!("Failed to read registry response from {}: {}", url, e);
            RegistryError::InvalidResponse {
                message: e.to_string(),
                context: context.clone(),
            }
        })?;

        let decoded = T::deserialize(&payload).map_err(|e| {
            warn!("Unexpected registry payload from {}: {}", url, e);
            RegistryError::InvalidResponse {
                message: e.to_string(),
                context: context.clone(),
            }
        })?;

        self.cache.insert(path, payload);
        Ok(decoded)
    }

    /// Fetches the identifiers of every product the registry tracks
    pub async fn get_all_products(&self) -> Result<Vec<String>, RegistryError> {
        self.request("/", RequestContext::none()).await
    }

    /// Fetches all cycles of a product, preserving the registry's ordering
    pub async fn get_product_cycles(&self, product: &str) -> Result<Vec<Cycle>, RegistryError> {
        self.request(&encoded_path(&[product]), RequestContext::product(product))
            .await
    }

    /// Fetches a single cycle of a product
    pub async fn get_product_cycle(
        &self,
        product: &str,
        cycle: &str,
    ) -> Result<Cycle, RegistryError> {
        self.request(
            &encoded_path(&[product, cycle]),
            RequestContext::cycle(product, cycle),
        )
        .await
    }

    // =========================================================================
    // v1 API: these expect a v1 base URL such as https://endoflife.date/api/v1
    // =========================================================================

    /// Fetches every product with its full cycle list
    pub async fn get_products_full_data(&self) -> Result<Vec<ProductDetails>, RegistryError> {
        self.request(&encoded_path(&["products", "full"]), RequestContext::none())
            .await
    }

    /// Fetches the most recent release cycle of a product
    pub async fn get_latest_release(&self, product: &str) -> Result<Cycle, RegistryError> {
        self.request(
            &encoded_path(&["products", product, "releases", "latest"]),
            RequestContext::product(product),
        )
        .await
    }

    pub async fn get_categories(&self) -> Result<Vec<String>, RegistryError> {
        self.request(&encoded_path(&["categories"]), RequestContext::none())
            .await
    }

    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductSummary>, RegistryError> {
        self.request(
            &encoded_path(&["categories", category]),
            RequestContext::none(),
        )
        .await
    }

    pub async fn get_tags(&self) -> Result<Vec<String>, RegistryError> {
        self.request(&encoded_path(&["tags"]), RequestContext::none())
            .await
    }

    pub async fn get_products_by_tag(
        &self,
        tag: &str,
    ) -> Result<Vec<ProductSummary>, RegistryError> {
        self.request(&encoded_path(&["tags", tag]), RequestContext::none())
            .await
    }

    /// Fetches the identifier schemes products can be looked up by (e.g. `purl`)
    pub async fn get_identifier_types(&self) -> Result<Vec<String>, RegistryError> {
        self.request(&encoded_path(&["identifiers"]), RequestContext::none())
            .await
    }

    /// Resolves a version to a tracked cycle.
    ///
    /// With fallback enabled the candidates are tried most specific first
    /// (`1.2.3` → `1.2` → `1`); otherwise only the cleaned version is tried.
    /// Returns `Ok(None)` when nothing matches.
    pub async fn get_cycle_info_with_fallback(
        &self,
        product: &str,
        version: &str,
        enable_fallback: bool,
    ) -> Result<Option<Cycle>, RegistryError> {
        let candidates = if enable_fallback {
            get_semantic_fallbacks(version)
        } else {
            vec![clean_version(version)]
        };

        let cycles = self.get_product_cycles(product).await?;

        for candidate in &candidates {
            if let Some(cycle) = cycles.iter().find(|c| c.cycle == *candidate) {
                debug!(
                    "Matched {} version {} to cycle {}",
                    product, version, cycle.cycle
                );
                return Ok(Some(cycle.clone()));
            }
            debug!("No {} cycle matches candidate {}", product, candidate);
        }

        Ok(None)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for EndOfLifeClient {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_URL,
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        )
    }
}

#[async_trait::async_trait]
impl CycleSource for EndOfLifeClient {
    async fn product_cycles(&self, product: &str) -> Result<Vec<Cycle>, RegistryError> {
        self.get_product_cycles(product).await
    }

    async fn cycle_for_version(
        &self,
        product: &str,
        version: &str,
        enable_fallback: bool,
    ) -> Result<Option<Cycle>, RegistryError> {
        self.get_cycle_info_with_fallback(product, version, enable_fallback)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::DateOrBool;
    use mockito::Server;
    use rstest::rstest;

    const PYTHON_CYCLES: &str = r#"[
        {"cycle": "3.12", "releaseDate": "2023-10-02", "eol": "2028-10-31", "latest": "3.12.4"},
        {"cycle": "3.11", "releaseDate": "2022-10-24", "eol": "2027-10-31", "latest": "3.11.9"},
        {"cycle": "3", "eol": false}
    ]"#;

    fn client_for(server: &Server) -> EndOfLifeClient {
        EndOfLifeClient::new(&server.url(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn get_all_products_returns_identifiers() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["python", "nodejs", "ubuntu"]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let products = client.get_all_products().await.unwrap();

        mock.assert_async().await;
        assert_eq!(products, vec!["python", "nodejs", "ubuntu"]);
    }

    #[tokio::test]
    async fn get_product_cycles_preserves_registry_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nodejs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": 18, "eol": "2025-04-30"}, {"cycle": 22, "eol": "2027-04-30"}, {"cycle": 20, "eol": "2026-04-30"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycles = client.get_product_cycles("nodejs").await.unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = cycles.iter().map(|c| c.cycle.as_str()).collect();
        assert_eq!(ids, vec!["18", "22", "20"]);
    }

    #[tokio::test]
    async fn get_product_cycle_returns_single_cycle() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python/3.12")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cycle": "3.12", "eol": "2028-10-31", "lts": false}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycle = client.get_product_cycle("python", "3.12").await.unwrap();

        mock.assert_async().await;
        assert_eq!(cycle.cycle, "3.12");
        assert_eq!(cycle.eol, Some(DateOrBool::Text("2028-10-31".to_string())));
    }

    #[tokio::test]
    async fn get_product_cycle_reports_status_and_context_on_not_found() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python/1.0")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .get_product_cycle("python", "1.0")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RegistryError::Status { status: 404, .. }));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.product(), Some("python"));
        assert_eq!(err.cycle(), Some("1.0"));
    }

    #[tokio::test]
    async fn server_error_is_not_cached() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(500)
            .with_body("Server Error")
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.get_product_cycles("python").await;
        let second = client.get_product_cycles("python").await;

        mock.assert_async().await;
        assert_eq!(first.unwrap_err().status_code(), Some(500));
        assert_eq!(second.unwrap_err().status_code(), Some(500));
        assert_eq!(client.get_cache_stats().size, 0);
    }

    #[tokio::test]
    async fn malformed_payload_returns_invalid_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"not": "an array"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_product_cycles("python").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RegistryError::InvalidResponse { .. }));
        assert_eq!(err.product(), Some("python"));
        assert_eq!(client.get_cache_stats().size, 0);
    }

    #[tokio::test]
    async fn unreachable_registry_returns_network_error() {
        let client = EndOfLifeClient::new("http://127.0.0.1:1", Duration::from_secs(60));

        let err = client.get_product_cycles("python").await.unwrap_err();

        assert!(matches!(err, RegistryError::Network { .. }));
        assert_eq!(err.status_code(), None);
        assert_eq!(err.product(), Some("python"));
    }

    #[tokio::test]
    async fn repeated_requests_within_ttl_hit_the_network_once() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PYTHON_CYCLES)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.get_product_cycles("python").await.unwrap();
        let second = client.get_product_cycles("python").await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, second);
        assert_eq!(
            client.get_cache_stats(),
            CacheStats {
                size: 1,
                keys: vec!["/python".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn expired_entry_triggers_exactly_one_refetch() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PYTHON_CYCLES)
            .expect(2)
            .create_async()
            .await;

        let client = EndOfLifeClient::new(&server.url(), Duration::from_secs(1));
        client.get_product_cycles("python").await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        client.get_product_cycles("python").await.unwrap();
        client.get_product_cycles("python").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["python"]"#)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        client.get_all_products().await.unwrap();
        client.clear_cache();
        assert_eq!(client.get_cache_stats().size, 0);
        client.get_all_products().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fallback_walks_from_patch_to_minor() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PYTHON_CYCLES)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycle = client
            .get_cycle_info_with_fallback("python", "v3.11.4", true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(cycle.map(|c| c.cycle), Some("3.11".to_string()));
    }

    #[tokio::test]
    async fn fallback_reaches_major_only_cycle() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PYTHON_CYCLES)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycle = client
            .get_cycle_info_with_fallback("python", "3.9.1", true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(cycle.map(|c| c.cycle), Some("3".to_string()));
    }

    #[tokio::test]
    async fn disabled_fallback_only_tries_exact_version() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PYTHON_CYCLES)
            .create_async()
            .await;

        let client = client_for(&server);
        let miss = client
            .get_cycle_info_with_fallback("python", "3.11.4", false)
            .await
            .unwrap();
        let hit = client
            .get_cycle_info_with_fallback("python", " v3.12 ", false)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(miss, None);
        assert_eq!(hit.map(|c| c.cycle), Some("3.12".to_string()));
    }

    #[tokio::test]
    async fn fallback_returns_none_when_nothing_matches() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nodejs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": 22}, {"cycle": 20}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycle = client
            .get_cycle_info_with_fallback("nodejs", "16.20.2", true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(cycle, None);
    }

    #[tokio::test]
    async fn fallback_lookup_is_idempotent_without_refetching() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nodejs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": 20, "eol": "2026-04-30", "lts": "2023-10-24"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client
            .get_cycle_info_with_fallback("nodejs", "20.11.1", true)
            .await
            .unwrap();
        let second = client
            .get_cycle_info_with_fallback("nodejs", "20.11.1", true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn fallback_propagates_registry_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/unknown")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .get_cycle_info_with_fallback("unknown", "1.0.0", true)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.is_not_found());
        assert_eq!(err.product(), Some("unknown"));
    }

    #[test]
    fn new_trims_trailing_slash_from_base_url() {
        let client = EndOfLifeClient::new("https://example.test/api/", Duration::from_secs(1));

        assert_eq!(client.base_url(), "https://example.test/api");
    }
    #[rstest]
    #[case(&["python"], "/python")]
    #[case(&["python", "3.12"], "/python/3.12")]
    #[case(&["python/3.12"], "/python%2F3.12")]
    #[case(&["my product"], "/my%20product")]
    #[case(&["products", "python", "releases", "latest"], "/products/python/releases/latest")]
    fn encoded_path_escapes_each_segment(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(encoded_path(segments), expected);
    }

    #[tokio::test]
    async fn slash_in_product_does_not_share_cache_entry_with_cycle_lookup() {
        let mut server = Server::new_async().await;

        let cycles = server
            .mock("GET", "/python%2F3.12")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": "1.0"}]"#)
            .expect(1)
            .create_async()
            .await;
        let cycle = server
            .mock("GET", "/python/3.12")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cycle": "3.12"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let listed = client.get_product_cycles("python/3.12").await.unwrap();
        let single = client.get_product_cycle("python", "3.12").await.unwrap();

        cycles.assert_async().await;
        cycle.assert_async().await;
        assert_eq!(listed[0].cycle, "1.0");
        assert_eq!(single.cycle, "3.12");
        assert_eq!(
            client.get_cache_stats().keys,
            vec!["/python%2F3.12".to_string(), "/python/3.12".to_string()]
        );
    }

    #[tokio::test]
    async fn fallback_keeps_leading_zeros_of_minor_segment() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/ubuntu")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": "24.04"}, {"cycle": "22.04"}, {"cycle": "20.04"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let cycle = client
            .get_cycle_info_with_fallback("ubuntu", "22.04.3", true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(cycle.map(|c| c.cycle), Some("22.04".to_string()));
    }

    #[tokio::test]
    async fn version_is_cleaned_once_with_or_without_fallback() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/python")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"cycle": "1.2"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let with_fallback = client
            .get_cycle_info_with_fallback("python", "vv1.2", true)
            .await
            .unwrap();
        let without_fallback = client
            .get_cycle_info_with_fallback("python", "vv1.2", false)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(with_fallback, None);
        assert_eq!(without_fallback, None);
    }

    #[tokio::test]
    async fn get_products_full_data_returns_products_with_releases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/products/full")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "python", "label": "Python", "category": "lang",
                     "releases": [{"cycle": "3.12", "releaseDate": "2023-10-02", "eol": "2028-10-02", "latest": "3.12.1", "lts": false}]},
                    {"name": "nodejs", "label": "Node.js", "category": "server-app",
                     "releases": [{"cycle": "20", "releaseDate": "2023-04-18", "eol": "2026-04-30", "latest": "20.10.0"}]}
                ]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let products = client.get_products_full_data().await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "python");
        assert_eq!(products[0].releases.len(), 1);
        assert_eq!(products[1].name, "nodejs");
    }

    #[tokio::test]
    async fn get_latest_release_returns_cycle() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/products/python/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cycle": "3.12", "releaseDate": "2023-10-02", "eol": "2028-10-02", "latest": "3.12.1", "lts": false}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let latest = client.get_latest_release("python").await.unwrap();

        mock.assert_async().await;
        assert_eq!(latest.cycle, "3.12");
        assert_eq!(latest.latest.as_deref(), Some("3.12.1"));
    }

    #[tokio::test]
    async fn get_latest_release_error_carries_product() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/products/unknown/releases/latest")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_latest_release("unknown").await.unwrap_err();

        mock.assert_async().await;
        assert!(err.is_not_found());
        assert_eq!(err.product(), Some("unknown"));
    }

    #[tokio::test]
    async fn get_products_by_category_returns_summaries() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/categories/lang")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "python", "label": "Python", "category": "lang"},
                    {"name": "nodejs", "label": "Node.js", "category": "lang"},
                    {"name": "go", "label": "Go", "category": "lang"}
                ]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let products = client.get_products_by_category("lang").await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "python");
        assert_eq!(products[0].category.as_deref(), Some("lang"));
    }

    #[tokio::test]
    async fn get_products_by_tag_returns_summaries() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/tags/database")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "postgresql", "label": "PostgreSQL", "category": "db"},
                    {"name": "mysql", "label": "MySQL", "category": "db"},
                    {"name": "mongodb", "label": "MongoDB", "category": "db"}
                ]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let products = client.get_products_by_tag("database").await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "postgresql");
    }

    #[rstest]
    #[case("/categories", r#"["lang", "os", "server-app", "framework"]"#, &["lang", "os", "server-app", "framework"])]
    #[case("/tags", r#"["database", "web-server", "container", "cloud"]"#, &["database", "web-server", "container", "cloud"])]
    #[case("/identifiers", r#"["purl", "cpe"]"#, &["purl", "cpe"])]
    #[tokio::test]
    async fn v1_listings_return_identifiers(
        #[case] path: &str,
        #[case] body: &str,
        #[case] expected: &[&str],
    ) {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = client_for(&server);
        let values = match path {
            "/categories" => client.get_categories().await,
            "/tags" => client.get_tags().await,
            _ => client.get_identifier_types().await,
        }
        .unwrap();

        mock.assert_async().await;
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case("/products/full", 500)]
    #[case("/categories", 500)]
    #[case("/categories/unknown", 404)]
    #[case("/tags", 500)]
    #[case("/tags/unknown", 404)]
    #[case("/identifiers", 500)]
    #[tokio::test]
    async fn v1_endpoints_report_error_status(#[case] path: &str, #[case] status: usize) {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", path)
            .with_status(status)
            .with_body("Server Error")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = match path {
            "/products/full" => client.get_products_full_data().await.map(|_| ()),
            "/categories" => client.get_categories().await.map(|_| ()),
            "/categories/unknown" => client.get_products_by_category("unknown").await.map(|_| ()),
            "/tags" => client.get_tags().await.map(|_| ()),
            "/tags/unknown" => client.get_products_by_tag("unknown").await.map(|_| ()),
            _ => client.get_identifier_types().await.map(|_| ()),
        }
        .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status_code(), Some(status as u16));
        assert_eq!(client.get_cache_stats().size, 0);
    }

    #[tokio::test]
    async fn v1_responses_share_the_response_cache() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/categories")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["lang", "os"]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.get_categories().await.unwrap();
        let second = client.get_categories().await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, vec!["lang", "os"]);
        assert_eq!(first, second);
        assert_eq!(
            client.get_cache_stats(),
            CacheStats {
                size: 1,
                keys: vec!["/categories".to_string()],
            }
        );
    }
}
