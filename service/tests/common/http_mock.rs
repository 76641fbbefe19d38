//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! A thin wrapper around `wiremock` for declarative HTTP stubbing.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/geocoder/locations/onelineaddress")
//!         .with_query("benchmark", "Public_AR_Current")
//!         .respond_with_json(json!({"result": {"addressMatches": []}}))
//!         .expect_times(1)
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(500)`
//! - **Request verification**: `.expect_times(n)` to assert call count

use serde_json::Value;
pub use wiremock::matchers::{method, path, path_regex, query_param};
pub use wiremock::MockServer as WiremockServer;
pub use wiremock::{Mock, ResponseTemplate};

/// A running stub server.
pub struct MockHttpServer {
    server: WiremockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: WiremockServer::start().await,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:54321`.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server for matchers the builder does not cover.
    pub fn inner(&self) -> &WiremockServer {
        &self.server
    }

    /// Start stubbing a GET to `route`.
    pub fn expect_get(&self, route: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            mock: Mock::given(method("GET")).and(path(route)),
            response: ResponseTemplate::new(200),
            times: None,
        }
    }

    /// Requests received so far.
    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// Panic if any `expect_times` expectation was not met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }
}

/// Builder for one stubbed route.
pub struct StubBuilder<'a> {
    server: &'a WiremockServer,
    mock: wiremock::MockBuilder,
    response: ResponseTemplate,
    times: Option<u64>,
}

impl StubBuilder<'_> {
    /// Only match requests carrying `key=value` in the query string.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.mock = self.mock.and(query_param(key, value));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.response = ResponseTemplate::new(200).set_body_json(body);
        self
    }

    pub fn respond_with_body(mut self, body: &str) -> Self {
        self.response = ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(body);
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.response = ResponseTemplate::new(status).set_body_string("upstream failure");
        self
    }

    /// Assert the route is hit exactly `n` times (checked on drop or `verify`).
    pub fn expect_times(mut self, n: u64) -> Self {
        self.times = Some(n);
        self
    }

    pub async fn mount(self) {
        let mut mock = self.mock.respond_with(self.response);
        if let Some(n) = self.times {
            mock = mock.expect(n);
        }
        mock.mount(self.server).await;
    }
}
