//! HTTP transport boundary.
//!
//! All network I/O goes through [`HttpTransport`] so the request pipeline can
//! be exercised against an in-memory transport in tests. The production
//! implementation is [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

use crate::error::{Result, WykopError};

/// Default timeout for ordinary API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for token endpoint calls.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for deletes that wait for server-side propagation.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal HTTP method enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP headers represented as key/value pairs.
///
/// Header names are treated case-insensitively by helper functions.
pub type HttpHeaders = Vec<(String, String)>;

/// A file attached to a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// A file sent under the `file` field, as the media endpoints expect.
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// A fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub query: Vec<(String, String)>,
    pub body: HttpBody,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Value of a query parameter, if present.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}

/// A minimal HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Response body as text (lossy).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport boundary for all HTTP I/O.
///
/// Implementations must not interpret status codes: a 404 is a successful
/// round trip as far as the transport is concerned.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one round trip.
    ///
    /// # Errors
    ///
    /// Returns [`WykopError::Timeout`] or [`WykopError::Network`] when no
    /// response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Get the first header value matching `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("wykop-rs/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| WykopError::Network(e.to_string()))
}

/// A real HTTP transport backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Transport with a client-wide timeout; per-request timeouts still apply.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::new(build_client(timeout)?))
    }

    fn map_error(err: &reqwest::Error, timeout: Duration) -> WykopError {
        if err.is_timeout() {
            WykopError::Timeout(timeout.as_secs())
        } else {
            WykopError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let timeout = request.timeout;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(timeout);
        for (k, v) in &request.headers {
            builder = builder.header(k, v);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            HttpBody::Empty => builder,
            HttpBody::Json(value) => builder.json(&value),
            HttpBody::Multipart(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime_type)
                    .map_err(|e| WykopError::Network(e.to_string()))?;
                builder.multipart(reqwest::multipart::Form::new().part(file.field, part))
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        let status = resp.status().as_u16();
        let headers: HttpHeaders = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
