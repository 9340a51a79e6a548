//! HTTP client for the lead-generation REST API.
//!
//! Stateless wrapper: each operation issues one request against the base URL
//! and maps the response. Non-2xx responses become an `ApiError::Application`
//! carrying the server's `detail` message verbatim when present, falling back
//! to an operation-specific default. No operation retries; a failed call is
//! terminal until the user acts again.

use crate::error::{ApiError, ApiResult};
use crate::types::{
    CreditUsage, HealthStatus, ResearchReport, SearchRequest, SearchResult, SeoIssueReport,
    SeoReport, UsageStats,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const FALLBACK_SEARCH: &str = "Search failed";
const FALLBACK_USAGE: &str = "Failed to load usage stats";
const FALLBACK_BUSINESSES: &str = "Failed to load businesses";
const FALLBACK_STATS: &str = "Failed to load business stats";
const FALLBACK_HEALTH: &str = "Health check failed";
const FALLBACK_RESEARCH: &str = "Company research failed";
const FALLBACK_SEO: &str = "SEO analysis failed";

/// Optional query parameters for `GET /api/businesses`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BusinessQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_website: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Client for the lead-generation backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:8000/api`).
    ///
    /// Every request carries `timeout`; there is no per-call cancellation
    /// beyond it.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run a business search. Replaces the previous result set on success.
    pub async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResult> {
        tracing::debug!(
            query = %request.query,
            location = %request.location,
            "Running business search"
        );
        let response = self
            .http
            .post(self.url("search"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::network(FALLBACK_SEARCH, e))?;
        decode_json(response, FALLBACK_SEARCH).await
    }

    /// Places API usage snapshot.
    pub async fn usage(&self) -> ApiResult<UsageStats> {
        self.get_json("search/usage", FALLBACK_USAGE).await
    }

    /// Stored businesses with optional filters. Passed through untyped.
    pub async fn businesses(&self, query: &BusinessQuery) -> ApiResult<serde_json::Value> {
        let response = self
            .http
            .get(self.url("businesses"))
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::network(FALLBACK_BUSINESSES, e))?;
        decode_json(response, FALLBACK_BUSINESSES).await
    }

    /// Aggregate stats over all stored businesses. Passed through untyped.
    pub async fn business_stats(&self) -> ApiResult<serde_json::Value> {
        self.get_json("businesses/stats/summary", FALLBACK_STATS)
            .await
    }

    /// Backend liveness and configuration state.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("health", FALLBACK_HEALTH).await
    }

    /// Scrape a business website and extract company data.
    ///
    /// The backend rejects businesses without a website; callers should gate
    /// on `Business::has_website` before offering this operation.
    pub async fn run_research(&self, business_id: u64) -> ApiResult<ResearchReport> {
        tracing::debug!(business_id, "Running company research");
        self.post_json(&format!("research/{business_id}"), FALLBACK_RESEARCH)
            .await
    }

    /// Stored research for a business, `None` when none exists yet.
    pub async fn research(&self, business_id: u64) -> ApiResult<Option<ResearchReport>> {
        self.get_json_opt(&format!("research/{business_id}"), FALLBACK_RESEARCH)
            .await
    }

    /// Scraping-credit usage snapshot.
    pub async fn research_usage(&self) -> ApiResult<CreditUsage> {
        self.get_json("research/usage", FALLBACK_USAGE).await
    }

    /// Audit a business website and produce a scored SEO report.
    pub async fn run_seo_analysis(&self, business_id: u64) -> ApiResult<SeoReport> {
        tracing::debug!(business_id, "Running SEO analysis");
        self.post_json(&format!("seo/analyze/{business_id}"), FALLBACK_SEO)
            .await
    }

    /// Stored SEO analysis for a business, `None` when none exists yet.
    pub async fn seo_analysis(&self, business_id: u64) -> ApiResult<Option<SeoReport>> {
        self.get_json_opt(&format!("seo/{business_id}"), FALLBACK_SEO)
            .await
    }

    /// Stored SEO issues grouped by severity, `None` when no analysis exists.
    pub async fn seo_issues(&self, business_id: u64) -> ApiResult<Option<SeoIssueReport>> {
        self.get_json_opt(&format!("seo/issues/{business_id}"), FALLBACK_SEO)
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ApiResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::network(fallback, e))?;
        decode_json(response, fallback).await
    }

    async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ApiResult<Option<T>> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::network(fallback, e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode_json(response, fallback).await.map(Some)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ApiResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::network(fallback, e))?;
        decode_json(response, fallback).await
    }
}

/// Map a response to a payload or an `ApiError` with one readable message.
async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> ApiResult<T> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::network(fallback, e))?;

    if !status.is_success() {
        let message = extract_detail(&bytes).unwrap_or_else(|| fallback.to_string());
        tracing::warn!(%status, %message, "API request failed");
        return Err(ApiError::Application { status, message });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        message: fallback.to_string(),
        source: e,
    })
}

/// Pull the `detail` string out of a FastAPI-style error body.
///
/// Validation errors carry `detail` as an array; those fall back to the
/// default message rather than dumping the structure at the user.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        let body = br#"{"detail": "Business not found"}"#;
        assert_eq!(extract_detail(body), Some("Business not found".to_string()));
    }

    #[test]
    fn test_extract_detail_missing_or_structured() {
        assert_eq!(extract_detail(b"{}"), None);
        assert_eq!(extract_detail(b"not json"), None);
        // FastAPI validation errors: detail is an array of objects
        let body = br#"{"detail": [{"loc": ["body", "query"], "msg": "field required"}]}"#;
        assert_eq!(extract_detail(body), None);
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("search"), "http://localhost:8000/api/search");
        assert_eq!(client.url("/seo/analyze/3"), "http://localhost:8000/api/seo/analyze/3");
    }

    /// Bind an ephemeral port, answer exactly one request with a canned
    /// response, and return a base URL pointing at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn test_stored_research_404_is_absent() {
        let base = serve_once("404 Not Found", r#"{"detail": "No research found"}"#).await;
        let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        assert!(client.research(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_seo_404_is_absent() {
        let base = serve_once("404 Not Found", r#"{"detail": "No SEO analysis found"}"#).await;
        let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        assert!(client.seo_analysis(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_issues_404_is_absent() {
        let base = serve_once("404 Not Found", r#"{"detail": "No SEO analysis found"}"#).await;
        let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        assert!(client.seo_issues(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_lookup_other_errors_surface() {
        // Only 404 means absent; anything else is a real failure
        let base = serve_once(
            "500 Internal Server Error",
            r#"{"detail": "Firecrawl unavailable"}"#,
        )
        .await;
        let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        match client.seo_analysis(42).await {
            Err(ApiError::Application { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Firecrawl unavailable");
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore] // Requires a running backend on localhost:8000
    async fn test_health_live() {
        let client = ApiClient::new("http://127.0.0.1:8000/api", Duration::from_secs(10)).unwrap();
        let health = client.health().await.unwrap();
        assert!(!health.status.is_empty());
    }
}
