//! Registry test utilities

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockito::{Mock, Server, ServerGuard};
use serde_json::{Value, json};

use eol_check::analyzer::EolAnalyzer;
use eol_check::registry::EndOfLifeClient;

/// Reference date used by every scenario
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()
}

pub fn python_cycles() -> Value {
    json!([
        {"cycle": "3.13", "releaseDate": "2024-10-07", "eol": "2029-10-31", "latest": "3.13.2", "latestReleaseDate": "2025-02-04", "lts": false},
        {"cycle": "3.12", "releaseDate": "2023-10-02", "eol": "2028-10-31", "latest": "3.12.9", "latestReleaseDate": "2025-02-04", "lts": false},
        {"cycle": "3.11", "releaseDate": "2022-10-24", "eol": "2027-10-31", "latest": "3.11.11", "latestReleaseDate": "2024-12-03", "lts": false},
        {"cycle": "3.7", "releaseDate": "2018-06-26", "eol": "2023-06-27", "latest": "3.7.17", "latestReleaseDate": "2023-06-05", "lts": false}
    ])
}

pub fn nodejs_cycles() -> Value {
    json!([
        {"cycle": "22", "releaseDate": "2024-04-24", "eol": "2027-04-30", "latest": "22.14.0", "lts": "2024-10-29"},
        {"cycle": "20", "releaseDate": "2023-04-18", "eol": "2026-04-30", "latest": "20.18.3", "lts": "2023-10-24"},
        {"cycle": "18", "releaseDate": "2022-04-19", "eol": "2025-04-30", "latest": "18.20.7", "lts": "2022-10-25"}
    ])
}

pub fn ubuntu_cycles() -> Value {
    json!([
        {"cycle": "22.04", "codename": "Jammy Jellyfish", "releaseDate": "2022-04-21", "eol": "2027-04-01", "extendedSupport": "2032-04-09", "latest": "22.04.5", "latestReleaseDate": "2024-09-12", "lts": true},
        {"cycle": "16.04", "codename": "Xenial Xerus", "releaseDate": "2016-04-21", "eol": "2021-04-02", "extendedSupport": "2026-04-02", "latest": "16.04.7", "latestReleaseDate": "2020-08-13", "lts": true}
    ])
}

/// Mock `GET /{product}` returning `body`, expected to be hit `hits` times
pub async fn mock_product(server: &mut ServerGuard, product: &str, body: &Value, hits: usize) -> Mock {
    server
        .mock("GET", format!("/{product}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Mock `GET /{product}` failing with `status`
pub async fn mock_product_status(server: &mut ServerGuard, product: &str, status: usize) -> Mock {
    server
        .mock("GET", format!("/{product}").as_str())
        .with_status(status)
        .with_body("{\"message\": \"Product not found\"}")
        .create_async()
        .await
}

pub async fn create_server() -> ServerGuard {
    Server::new_async().await
}

/// Client for the mock server with a one hour cache
pub fn create_client(server: &ServerGuard) -> Arc<EndOfLifeClient> {
    Arc::new(EndOfLifeClient::new(&server.url(), Duration::from_secs(3600)))
}

/// Analyzer pinned to [`reference_date`]
pub fn create_analyzer(client: Arc<EndOfLifeClient>, eol_threshold_days: i64) -> EolAnalyzer {
    EolAnalyzer::new(client, eol_threshold_days).with_reference_date(reference_date())
}
