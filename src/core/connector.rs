//! Authorised request execution and envelope unwrapping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde_json::json;
use tracing::{debug, info};

use super::envelope::Envelope;
use super::http::{
    DEFAULT_TIMEOUT, FilePart, HttpBody, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport,
};
use super::params::Params;
use super::session::{Credentials, Session, join_url, parse_base_url};
use crate::error::Result;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://wykop.pl/api/v3/";

/// Connection settings.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// API root; endpoints are joined onto it.
    pub base_url: Url,
    /// Timeout used when a request does not set its own.
    pub timeout: Duration,
}

impl ConnectorConfig {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One call to the API, before authorisation headers are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL; a leading slash is ignored.
    pub endpoint: String,
    /// Sent as `{"data": body}` when present and non-empty.
    pub body: Option<Params>,
    pub query: Params,
    pub file: Option<FilePart>,
    /// Overrides the connector timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Params::new(),
            file: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    #[must_use]
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    #[must_use]
    pub fn body(mut self, body: Params) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Executes API requests on behalf of one [`Session`].
pub struct Connector {
    transport: Arc<dyn HttpTransport>,
    config: ConnectorConfig,
    session: Session,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Authenticate and build a connector over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Fails if the token exchange fails (see [`Session::acquire`]).
    pub async fn connect(
        transport: Arc<dyn HttpTransport>,
        config: ConnectorConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        let session = Session::acquire(transport.as_ref(), &config.base_url, credentials).await?;
        Ok(Self {
            transport,
            config,
            session,
        })
    }

    /// Authenticate over a reqwest-backed transport.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the token exchange fails.
    pub async fn connect_http(config: ConnectorConfig, credentials: Credentials) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.timeout)?;
        Self::connect(Arc::new(transport), config, credentials).await
    }

    /// Perform one request and unwrap its envelope.
    ///
    /// Status codes are not interpreted here: a 404 comes back as an
    /// `Ok(Envelope)` with `status == 404`.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and undecodable 2xx bodies.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Envelope> {
        let url = join_url(&self.config.base_url, &request.endpoint)?;
        info!(
            method = %request.method,
            url = %url,
            params = %serde_json::to_string(&request.query).unwrap_or_default(),
            data = %request.body.as_ref().map(|b| serde_json::to_string(b).unwrap_or_default()).unwrap_or_default(),
            "Executing request"
        );

        let body = match (&request.file, &request.body) {
            (Some(file), _) => HttpBody::Multipart(file.clone()),
            (None, Some(body)) if !body.is_empty() => HttpBody::Json(json!({ "data": body })),
            (None, _) => HttpBody::Empty,
        };

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method,
                url,
                headers: self.session.headers(),
                query: request.query.to_query(),
                body,
                timeout: request.timeout.unwrap_or(self.config.timeout),
            })
            .await?;

        debug!(status = response.status, body = %response.text(), "Response received");
        Envelope::from_body(response.status, &response.body)
    }

    /// Interactive login URL (see [`Session::connect_url`]).
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn connect_url(&self) -> Result<String> {
        self.session
            .connect_url(self.transport.as_ref(), &self.config.base_url)
            .await
    }

    /// Renew the access token, rotating the refresh token if the service
    /// issues a new one.
    ///
    /// # Errors
    ///
    /// See [`Session::refresh`].
    pub async fn refresh_session(&mut self) -> Result<()> {
        self.session
            .refresh(self.transport.as_ref(), &self.config.base_url)
            .await?;
        Ok(())
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn config(&self) -> &ConnectorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::DELETE_TIMEOUT;
    use crate::test_utils::{
        MockTransport, TEST_BASE_URL, empty_response, error_response, json_response,
        token_response,
    };
    use serde_json::json;

    async fn connector(transport: &MockTransport) -> Connector {
        transport.push_response(
            HttpMethod::Post,
            format!("{TEST_BASE_URL}auth"),
            token_response("tok", None),
        );
        let creds = Credentials::KeySecret {
            key: "k".into(),
            secret: "s".into(),
        };
        Connector::connect(
            Arc::new(transport.clone()),
            ConnectorConfig::new(TEST_BASE_URL).unwrap(),
            creds,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn execute_wraps_body_and_attaches_headers() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        transport.push_response(
            HttpMethod::Post,
            format!("{TEST_BASE_URL}entries"),
            json_response(200, &json!({"data": {"id": 7}})),
        );

        let body = Params::new()
            .with("content", Some("hello"))
            .with::<&str>("photo", None)
            .with("adult", Some(false));
        let env = conn
            .execute(&ApiRequest::post("/entries").body(body))
            .await
            .unwrap();

        assert_eq!(env.status, 200);
        assert_eq!(env.data, json!({"id": 7}));

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, format!("{TEST_BASE_URL}entries"));
        assert_eq!(sent.header("Authorization"), Some("Bearer tok"));
        assert_eq!(sent.header("Accept"), Some("application/json"));
        assert_eq!(
            sent.body,
            HttpBody::Json(json!({"data": {"content": "hello", "adult": false}}))
        );
        assert_eq!(sent.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn execute_without_body_sends_no_payload() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        transport.push_response(
            HttpMethod::Delete,
            format!("{TEST_BASE_URL}media/photos/abc"),
            empty_response(204),
        );

        let env = conn
            .execute(&ApiRequest::delete("media/photos/abc").timeout(DELETE_TIMEOUT))
            .await
            .unwrap();

        assert_eq!(env.status, 204);
        assert!(env.data_is_empty());
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.body, HttpBody::Empty);
        assert_eq!(sent.timeout, DELETE_TIMEOUT);
    }

    #[tokio::test]
    async fn execute_passes_query_and_file_through() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        transport.push_response(
            HttpMethod::Post,
            format!("{TEST_BASE_URL}media/photos/upload"),
            json_response(200, &json!({"data": {"key": "k1"}})),
        );

        let file = FilePart::new("1.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        conn.execute(
            &ApiRequest::post("media/photos/upload")
                .query(Params::new().with("type", Some("content")))
                .file(file.clone()),
        )
        .await
        .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.query_value("type"), Some("content"));
        assert_eq!(sent.body, HttpBody::Multipart(file));
    }

    #[tokio::test]
    async fn execute_does_not_fail_on_error_status() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        transport.push_response(
            HttpMethod::Get,
            format!("{TEST_BASE_URL}entries/1"),
            error_response(404, "Not found"),
        );

        let env = conn.execute(&ApiRequest::get("entries/1")).await.unwrap();
        assert_eq!(env.status, 404);
        assert_eq!(env.error.get("message"), Some(&json!("Not found")));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        let err = conn.execute(&ApiRequest::get("tags/popular")).await.unwrap_err();
        assert!(matches!(err, crate::error::WykopError::Network(_)));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn execute_logs_method_url_and_params() {
        let transport = MockTransport::new();
        let conn = connector(&transport).await;
        transport.push_response(
            HttpMethod::Get,
            format!("{TEST_BASE_URL}tags/popular"),
            json_response(200, &json!({"data": []})),
        );

        let query = Params::new().with("page", Some(2));
        conn.execute(&ApiRequest::get("tags/popular").query(query))
            .await
            .unwrap();

        assert!(logs_contain("Executing request"));
        assert!(logs_contain("url=https://wykop.pl/api/v3/tags/popular"));
        assert!(logs_contain("\"page\":2"));
    }
}
