//! Wiremock stand-ins for the token endpoint and the REST API.

use crate::fixtures;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

/// Token handed out by [`mount_token_endpoint`].
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
/// Default token endpoint path.
pub const TOKEN_PATH: &str = "/oauth2/token";
/// Default REST API prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Serve a password grant for `username` at the default token path,
/// expecting exactly `times` token requests.
pub async fn mount_token_endpoint(server: &MockServer, username: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains(format!("username={username}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::access_grant(TEST_ACCESS_TOKEN)))
        .expect(times)
        .named("token endpoint")
        .mount(server)
        .await;
}

/// Fail any token request and expect none.
pub async fn forbid_token_requests(server: &MockServer) {
    Mock::given(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .named("unexpected token request")
        .mount(server)
        .await;
}

/// Answer `GET {API_PREFIX}/{resource_path}` with `body` when the bearer
/// token is `token`.
pub async fn mount_get(server: &MockServer, resource_path: &str, token: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/{resource_path}")))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `GET {API_PREFIX}/{resource_path}` with a raw body.
pub async fn mount_get_raw(server: &MockServer, resource_path: &str, token: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/{resource_path}")))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
