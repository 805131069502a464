//! wiremock stand-in for the Wykop API.
#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wykop::WykopApi;
use wykop::core::{ConnectorConfig, Credentials};

pub const KEY: &str = "app-key";
pub const SECRET: &str = "app-s3cret";
pub const ACCESS_TOKEN: &str = "access-tok-123";

/// API root served by `server`, with the trailing slash joins rely on.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/api/v3/", server.uri())
}

pub fn api_path(endpoint: &str) -> String {
    format!("/api/v3/{endpoint}")
}

pub fn token_body(token: &str, refresh_token: Option<&str>) -> Value {
    let mut data = json!({ "token": token });
    if let Some(rt) = refresh_token {
        data["refresh_token"] = json!(rt);
    }
    json!({ "data": data })
}

pub fn error_body(code: u16, message: &str) -> Value {
    json!({ "error": { "code": code, "hash": "", "key": 0, "message": message } })
}

/// Accept the test key/secret pair on `auth`.
pub async fn mount_key_secret_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("auth")))
        .and(body_json(json!({ "data": { "key": KEY, "secret": SECRET } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(ACCESS_TOKEN, None)))
        .mount(server)
        .await;
}

/// Exchange `refresh_token` once for an access token and `rotated`.
pub async fn mount_refresh(server: &MockServer, refresh_token: &str, rotated: Option<&str>) {
    Mock::given(method("POST"))
        .and(path(api_path("refresh-token")))
        .and(body_json(json!({ "data": { "refresh_token": refresh_token } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(ACCESS_TOKEN, rotated)))
        .mount(server)
        .await;
}

pub fn config(server: &MockServer) -> ConnectorConfig {
    ConnectorConfig::new(&base_url(server)).expect("mock server URL is valid")
}

/// Anonymous client talking to `server` over real HTTP.
pub async fn connect_anonymous(server: &MockServer) -> WykopApi {
    mount_key_secret_auth(server).await;
    let credentials = Credentials::KeySecret {
        key: KEY.to_string(),
        secret: SECRET.to_string(),
    };
    WykopApi::connect(config(server), credentials)
        .await
        .expect("key/secret auth should succeed")
}
