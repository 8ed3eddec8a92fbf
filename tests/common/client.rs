//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for every server endpoint.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Server Status
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Releases
    // ========================================================================

    /// GET /api/releases with the given query parameters
    pub async fn list_releases(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/api/releases", self.base_url))
            .query(query)
            .send()
            .await
            .expect("List releases request failed")
    }

    /// POST /api/releases with a JSON body
    pub async fn create_catalog_entries(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/api/releases", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Create request failed")
    }

    /// POST /api/releases with a raw body, for malformed payloads
    pub async fn create_catalog_entries_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/api/releases", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Create request failed")
    }
}
