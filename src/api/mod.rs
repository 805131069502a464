//! Endpoint facade.
//!
//! [`WykopApi`] exposes one method per documented endpoint. Each method builds
//! the path and parameters, runs the request through the [`Connector`] and
//! then classifies the status with a [`StatusPolicy`]. Payloads are returned
//! as `serde_json::Value`.

pub mod classify;
pub mod comments;
pub mod entries;
pub mod media;
pub mod tags;
pub mod users;

use std::sync::Arc;

use serde_json::Value;

use crate::core::connector::{ApiRequest, Connector, ConnectorConfig};
use crate::core::envelope::{Cursor, PageBudget};
use crate::core::http::HttpTransport;
use crate::core::session::Credentials;
use crate::error::{Result, WykopError};

pub use classify::StatusPolicy;
pub use entries::{EntriesQuery, EntryDraft};
pub use comments::CommentDraft;
pub use tags::{TagNewerQuery, TagStreamQuery};

/// Client for the Wykop v3 API.
#[derive(Debug)]
pub struct WykopApi {
    connector: Connector,
}

impl WykopApi {
    /// Authenticate against the production service (or `config.base_url`).
    ///
    /// # Errors
    ///
    /// Fails when the token exchange fails.
    pub async fn connect(config: ConnectorConfig, credentials: Credentials) -> Result<Self> {
        Ok(Self::from_connector(
            Connector::connect_http(config, credentials).await?,
        ))
    }

    /// Authenticate over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Fails when the token exchange fails.
    pub async fn with_transport(
        transport: Arc<dyn HttpTransport>,
        config: ConnectorConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        Ok(Self::from_connector(
            Connector::connect(transport, config, credentials).await?,
        ))
    }

    #[must_use]
    pub const fn from_connector(connector: Connector) -> Self {
        Self { connector }
    }

    #[must_use]
    pub const fn connector(&self) -> &Connector {
        &self.connector
    }

    /// URL of the interactive login flow that yields a refresh token.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn connect_url(&self) -> Result<String> {
        self.connector.connect_url().await
    }

    /// Refresh token to persist for the next run, if the session has one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.connector.session().refresh_token()
    }

    /// Exchange the refresh token (or key + secret) for a new access token.
    ///
    /// # Errors
    ///
    /// See [`crate::core::session::Session::refresh`].
    pub async fn refresh_session(&mut self) -> Result<()> {
        self.connector.refresh_session().await
    }

    async fn call(&self, request: ApiRequest, policy: StatusPolicy) -> Result<Value> {
        let envelope = self.connector.execute(&request).await?;
        policy.check(&envelope)?;
        Ok(envelope.data)
    }

    async fn call_unit(&self, request: ApiRequest, policy: StatusPolicy) -> Result<()> {
        self.call(request, policy).await.map(drop)
    }

    async fn call_paginated(
        &self,
        request: ApiRequest,
        start: Cursor,
        budget: PageBudget,
        policy: StatusPolicy,
    ) -> Result<Value> {
        let envelope = self
            .connector
            .execute_paginated(&request, start, budget)
            .await?;
        policy.check(&envelope)?;
        Ok(envelope.data)
    }

    /// `data.count` of a "newer" endpoint; `lenient` maps a missing count to 0.
    async fn call_count(
        &self,
        request: ApiRequest,
        policy: StatusPolicy,
        lenient: bool,
    ) -> Result<i64> {
        let data = self.call(request, policy).await?;
        match data.get("count").and_then(Value::as_i64) {
            Some(count) => Ok(count),
            None if lenient => Ok(0),
            None => Err(WykopError::ParseResponse(format!(
                "missing count in {data}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::HttpMethod;
    use crate::test_utils::{MockTransport, TEST_BASE_URL, json_response, token_response};
    use serde_json::json;

    async fn api(transport: &MockTransport) -> WykopApi {
        transport.push_response(
            HttpMethod::Post,
            format!("{TEST_BASE_URL}refresh-token"),
            token_response("tok-1", Some("rt-2")),
        );
        WykopApi::with_transport(
            Arc::new(transport.clone()),
            ConnectorConfig::new(TEST_BASE_URL).unwrap(),
            Credentials::RefreshToken("rt-1".into()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn refresh_token_tracks_rotation() {
        let transport = MockTransport::new();
        let mut api = api(&transport).await;
        assert_eq!(api.refresh_token(), Some("rt-2"));

        transport.push_response(
            HttpMethod::Post,
            format!("{TEST_BASE_URL}refresh-token"),
            token_response("tok-2", Some("rt-3")),
        );
        api.refresh_session().await.unwrap();
        assert_eq!(api.refresh_token(), Some("rt-3"));
        assert_eq!(api.connector().session().access_token(), "tok-2");
    }

    #[tokio::test]
    async fn connect_url_is_returned() {
        let transport = MockTransport::new();
        let api = api(&transport).await;
        transport.push_response(
            HttpMethod::Get,
            format!("{TEST_BASE_URL}connect"),
            json_response(200, &json!({"data": {"connect_url": "https://wykop.pl/connect/x"}})),
        );
        assert_eq!(api.connect_url().await.unwrap(), "https://wykop.pl/connect/x");
    }

    #[tokio::test]
    async fn strict_count_requires_field() {
        let transport = MockTransport::new();
        let api = api(&transport).await;
        transport.set_fallback(json_response(200, &json!({"data": {}})));

        let lenient = api
            .call_count(ApiRequest::get("x/newer"), StatusPolicy::GENERIC, true)
            .await
            .unwrap();
        assert_eq!(lenient, 0);

        let strict = api
            .call_count(ApiRequest::get("x/newer"), StatusPolicy::GENERIC, false)
            .await;
        assert!(matches!(strict, Err(WykopError::ParseResponse(_))));
    }
}
