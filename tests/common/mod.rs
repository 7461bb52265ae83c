#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Response;
use chrono::{TimeDelta, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use wiremock::MockServer;

use toolrent_console::config::Config;
use toolrent_console::services::auth::TokenSet;
use toolrent_console::services::auth::claims::decode_unverified;
use toolrent_console::services::identity::{IdentityProvider, KeycloakClient};
use toolrent_console::state::AppState;

pub const REALM: &str = "sisgr-realm";
pub const TOKEN_PATH: &str = "/realms/sisgr-realm/protocol/openid-connect/token";

/// A Keycloak-shaped access token. The console never verifies signatures, so
/// any key will do.
pub fn mint_token(username: &str, roles: &[&str], expires_in: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": format!("{username}-id"),
        "iat": now,
        "exp": now + expires_in,
        "preferred_username": username,
        "realm_access": { "roles": roles },
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("mint token")
}

pub fn config(backend: &str, keycloak: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("BACKEND_BASE_URL".to_string(), backend.to_string()),
        ("KEYCLOAK_URL".to_string(), keycloak.to_string()),
        ("KEYCLOAK_REALM".to_string(), REALM.to_string()),
        ("PUBLIC_BASE_URL".to_string(), "http://console.test".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|k| vars.get(k).cloned()).expect("test config")
}

/// Backend and Keycloak both served by wiremock.
pub struct Harness {
    pub backend: MockServer,
    pub keycloak: MockServer,
    pub state: AppState,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    pub async fn start_with(extra: &[(&str, &str)]) -> Self {
        let backend = MockServer::start().await;
        let keycloak = MockServer::start().await;
        let config = config(&backend.uri(), &keycloak.uri(), extra);

        let http = reqwest::Client::new();
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(KeycloakClient::from_config(http.clone(), &config));
        let state = AppState::new(config, http, identity);

        Self {
            backend,
            keycloak,
            state,
        }
    }

    /// Log in as `username` with `roles`; the access token expires in
    /// `expires_in` seconds. Returns the access token.
    pub fn login_as(&self, username: &str, roles: &[&str], expires_in: i64) -> String {
        let access_token = mint_token(username, roles, expires_in);
        let claims = decode_unverified(&access_token).expect("decode minted token");
        let tokens = TokenSet {
            access_token: access_token.clone(),
            refresh_token: Some("refresh-1".to_string()),
            id_token: Some("id-1".to_string()),
            expires_at: Utc::now() + TimeDelta::seconds(expires_in),
        };
        self.state.session.establish(tokens, &claims);
        access_token
    }
}

pub async fn body_string(res: Response<Body>) -> String {
    let bytes = res
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn tool_json(id: i64, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "category": "Power",
        "status": status,
        "stock": 3,
        "replacementValue": 45000
    })
}

pub fn client_json(id: i64, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "rut": "12.345.678-9",
        "name": name,
        "phone": "+56 9 1234 5678",
        "email": "client@example.com",
        "status": status
    })
}
