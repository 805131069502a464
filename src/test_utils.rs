//! Test utilities for wykop.
//!
//! Provides an in-memory [`MockTransport`], response factories and a
//! temporary directory helper for use across unit and integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wykop::test_utils::*;
//!
//! let transport = MockTransport::new();
//! transport.push_response(HttpMethod::Get, "https://wykop.pl/api/v3/entries", page_response(&[1, 2], None));
//! ```

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::core::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{Result, WykopError};

/// Base URL used by tests that talk to the mock transport.
pub const TEST_BASE_URL: &str = "https://wykop.pl/api/v3/";

// =============================================================================
// Mock transport
// =============================================================================

/// In-memory mock transport.
///
/// Responses are registered per method + URL (query string excluded) and
/// served in FIFO order. Every request is recorded. When nothing is queued for
/// a route, the fallback response is used if one is set; otherwise the call
/// fails like a network error would.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<(HttpMethod, String), VecDeque<HttpResponse>>,
    fallback: Option<HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for a method + URL.
    ///
    /// If multiple responses are registered for the same key, they are returned
    /// in FIFO order.
    pub fn push_response(&self, method: HttpMethod, url: impl Into<String>, response: HttpResponse) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(response);
    }

    /// Response served for any request without a queued route.
    pub fn set_fallback(&self, response: HttpResponse) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.fallback = Some(response);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        let inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.requests.clone()
    }

    /// Most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }

    /// Forget recorded requests (queued responses are kept).
    pub fn clear_requests(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.requests.clear();
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");

        let key = (request.method, request.url.clone());
        inner.requests.push(request);

        if let Some(resp) = inner.routes.get_mut(&key).and_then(VecDeque::pop_front) {
            return Ok(resp);
        }
        inner.fallback.clone().ok_or_else(|| {
            WykopError::Network(format!("no mock response registered for {} {}", key.0, key.1))
        })
    }
}

// =============================================================================
// Response factories
// =============================================================================

/// Response with a JSON body.
#[must_use]
pub fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: body.to_string().into_bytes(),
    }
}

/// Response with no body at all.
#[must_use]
pub fn empty_response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: Vec::new(),
    }
}

/// Token endpoint answer.
#[must_use]
pub fn token_response(token: &str, refresh_token: Option<&str>) -> HttpResponse {
    let mut data = json!({ "token": token });
    if let Some(rt) = refresh_token {
        data["refresh_token"] = json!(rt);
    }
    json_response(200, &json!({ "data": data }))
}

/// One page of `{"id": n}` items, optionally carrying `pagination.next`.
#[must_use]
pub fn page_response(ids: &[i64], next: Option<&str>) -> HttpResponse {
    let data: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    let pagination = next.map_or_else(
        || json!({ "per_page": 25, "total": 1000 }),
        |hash| json!({ "next": hash, "prev": null }),
    );
    json_response(200, &json!({ "data": data, "pagination": pagination }))
}

/// Error envelope as the service sends it.
#[must_use]
pub fn error_response(status: u16, message: &str) -> HttpResponse {
    json_response(
        status,
        &json!({ "error": { "code": status, "hash": "", "key": 0, "message": message } }),
    )
}

/// Minimal entry payload.
#[must_use]
pub fn make_test_entry(id: i64, content: &str, adult: bool) -> Value {
    json!({
        "id": id,
        "content": content,
        "adult": adult,
        "author": { "username": "tester" },
        "votes": { "up": 0, "down": 0, "users": [] },
    })
}

// =============================================================================
// Temporary directories
// =============================================================================

/// A temporary directory that is removed when dropped.
///
/// Uses the `tempfile` crate internally.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Path of a (possibly not yet existing) file inside the directory.
    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }

    /// Create a file with the given contents and return its path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::{DEFAULT_TIMEOUT, HttpBody};

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            body: HttpBody::Empty,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[tokio::test]
    async fn mock_transport_serves_fifo_and_records() {
        let transport = MockTransport::new();
        let url = "https://wykop.pl/api/v3/entries";
        transport.push_response(HttpMethod::Get, url, page_response(&[1], None));
        transport.push_response(HttpMethod::Get, url, page_response(&[2], None));

        let first = transport.send(get(url)).await.unwrap();
        let second = transport.send(get(url)).await.unwrap();

        assert!(first.text().contains("\"id\":1"));
        assert!(second.text().contains("\"id\":2"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn mock_transport_errors_without_route() {
        let transport = MockTransport::new();
        let err = transport.send(get("https://example.com/missing")).await.unwrap_err();
        assert!(matches!(err, WykopError::Network(msg) if msg.contains("/missing")));
    }

    #[tokio::test]
    async fn fallback_response_is_used() {
        let transport = MockTransport::new();
        transport.set_fallback(empty_response(204));
        let resp = transport.send(get("https://example.com/any")).await.unwrap();
        assert_eq!(resp.status, 204);
    }

    #[test]
    fn test_dir_creates_files() {
        let dir = TestDir::new();
        let path = dir.create_file("nested/token.txt", "abc");
        assert_eq!(fs::read_to_string(path).unwrap(), "abc");
    }
}
