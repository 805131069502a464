//! Access token lifecycle.
//!
//! A [`Session`] is created from [`Credentials`] and immediately exchanges
//! them for an access token. Key + secret gives an anonymous (app) session;
//! a refresh token gives a logged-in session. Refresh tokens are effectively
//! single use: the service may hand back a new one on every exchange, so
//! callers should persist [`Session::refresh_token`] after each run.
//!
//! Refreshing requires `&mut Session`; sharing a session between tasks that
//! may refresh it needs external locking.

use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::envelope::Envelope;
use super::http::{AUTH_TIMEOUT, HttpBody, HttpMethod, HttpRequest, HttpTransport};
use crate::error::{Result, WykopError};

/// How the session obtains its access token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Application key and secret (anonymous access).
    KeySecret { key: String, secret: String },
    /// User refresh token (logged-in access).
    RefreshToken(String),
}

impl Credentials {
    /// Pick a credential form from optional inputs.
    ///
    /// A complete key/secret pair wins over a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`WykopError::AuthConfig`] when neither form is complete.
    pub fn from_parts(
        key: Option<String>,
        secret: Option<String>,
        refresh_token: Option<String>,
    ) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_empty(key), non_empty(secret), non_empty(refresh_token)) {
            (Some(key), Some(secret), _) => Ok(Self::KeySecret { key, secret }),
            (_, _, Some(token)) => Ok(Self::RefreshToken(token)),
            _ => Err(WykopError::AuthConfig),
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::RefreshToken(_))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeySecret { key, .. } => f
                .debug_struct("KeySecret")
                .field("key", key)
                .field("secret", &"<redacted>")
                .finish(),
            Self::RefreshToken(_) => f.debug_tuple("RefreshToken").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenData {
    token: String,
    #[serde(default, alias = "refresh-token")]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectData {
    connect_url: String,
}

/// Current access token plus the credentials used to renew it.
pub struct Session {
    credentials: Credentials,
    access_token: String,
    refresh_token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("has_access_token", &!self.access_token.is_empty())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

impl Session {
    /// Exchange `credentials` for an access token.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; a non-2xx answer from the token endpoint
    /// becomes [`WykopError::Api`], a 2xx answer without a token
    /// [`WykopError::ParseResponse`].
    pub async fn acquire(
        transport: &dyn HttpTransport,
        base_url: &Url,
        credentials: Credentials,
    ) -> Result<Self> {
        let refresh_token = match &credentials {
            Credentials::RefreshToken(token) => Some(token.clone()),
            Credentials::KeySecret { .. } => None,
        };
        let mut session = Self {
            credentials,
            access_token: String::new(),
            refresh_token,
        };
        session.refresh(transport, base_url).await?;
        Ok(session)
    }

    /// Obtain a fresh access token, rotating the refresh token when the
    /// service returns a new one. Returns the new access token.
    ///
    /// # Errors
    ///
    /// See [`Session::acquire`].
    pub async fn refresh(&mut self, transport: &dyn HttpTransport, base_url: &Url) -> Result<&str> {
        let (endpoint, payload) = match (&self.credentials, &self.refresh_token) {
            (Credentials::KeySecret { key, secret }, _) => {
                ("auth", json!({ "key": key, "secret": secret }))
            }
            (Credentials::RefreshToken(_), Some(token)) => {
                ("refresh-token", json!({ "refresh_token": token }))
            }
            (Credentials::RefreshToken(_), None) => return Err(WykopError::AuthConfig),
        };

        let url = join_url(base_url, endpoint)?;
        info!(endpoint, "Requesting access token");
        let response = transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url,
                headers: vec![
                    ("Accept".to_string(), "application/json".to_string()),
                    ("Content-Type".to_string(), "application/json".to_string()),
                ],
                query: Vec::new(),
                body: HttpBody::Json(json!({ "data": payload })),
                timeout: AUTH_TIMEOUT,
            })
            .await?;

        let envelope = Envelope::from_body(response.status, &response.body)?;
        if !envelope.is_success() {
            return Err(WykopError::api(envelope.status, envelope.error_text()));
        }
        let data: TokenData = envelope
            .data_as()
            .map_err(|e| WykopError::ParseResponse(format!("{endpoint}: {e}")))?;

        if let Some(rotated) = data.refresh_token {
            debug!("Refresh token rotated");
            self.refresh_token = Some(rotated);
        }
        self.access_token = data.token;
        Ok(&self.access_token)
    }

    /// Headers every authorised request carries.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.access_token),
            ),
        ]
    }

    /// Login URL for the interactive WykopConnect hand-off. The refresh
    /// token shows up in the `rtoken` parameter of the final redirect.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; fails with [`WykopError::Api`] on a
    /// non-2xx answer.
    pub async fn connect_url(&self, transport: &dyn HttpTransport, base_url: &Url) -> Result<String> {
        let response = transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: join_url(base_url, "connect")?,
                headers: self.headers(),
                query: Vec::new(),
                body: HttpBody::Empty,
                timeout: AUTH_TIMEOUT,
            })
            .await?;

        let envelope = Envelope::from_body(response.status, &response.body)?;
        if !envelope.is_success() {
            return Err(WykopError::api(envelope.status, envelope.error_text()));
        }
        let data: ConnectData = envelope
            .data_as()
            .map_err(|e| WykopError::ParseResponse(format!("connect: {e}")))?;
        Ok(data.connect_url)
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Latest refresh token, to be persisted by the caller.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Join an endpoint onto the base URL, ignoring a leading slash.
///
/// # Errors
///
/// Returns [`WykopError::InvalidUrl`] when the result is not a valid URL.
pub fn join_url(base_url: &Url, endpoint: &str) -> Result<String> {
    base_url
        .join(endpoint.trim_start_matches('/'))
        .map(|url| url.to_string())
        .map_err(|e| WykopError::InvalidUrl(format!("{base_url} + {endpoint}: {e}")))
}

/// Parse a base URL, making sure it ends with a slash so joins append.
///
/// # Errors
///
/// Returns [`WykopError::InvalidUrl`] when `raw` is not an absolute URL.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| WykopError::InvalidUrl(format!("{raw}: {e}")))
}
