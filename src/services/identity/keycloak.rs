//! Keycloak (OpenID Connect) client.
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, warn};
use url::Url;

use super::{IdentityError, IdentityProvider, ProviderMetadata, TokenResponse};
use crate::config::Config;

#[derive(Clone, Debug)]
pub struct KeycloakClient {
    http: reqwest::Client,
    // {KEYCLOAK_URL}/realms/{realm}
    realm_url: String,
    client_id: String,
    redirect_uri: String,
    post_logout_redirect_uri: String,
}

impl KeycloakClient {
    pub fn new(
        http: reqwest::Client,
        keycloak_url: &str,
        realm: &str,
        client_id: &str,
        public_base_url: &str,
    ) -> Self {
        Self {
            http,
            realm_url: format!("{}/realms/{}", keycloak_url.trim_end_matches('/'), realm),
            client_id: client_id.to_string(),
            redirect_uri: format!("{}/auth/callback", public_base_url.trim_end_matches('/')),
            post_logout_redirect_uri: format!("{}/", public_base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(
            http,
            &config.keycloak_url,
            &config.keycloak_realm,
            &config.keycloak_client_id,
            &config.public_base_url,
        )
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/protocol/openid-connect/{}", self.realm_url, name)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, IdentityError> {
        let resp = self
            .http
            .post(self.endpoint("token"))
            .form(form)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(resp.json::<TokenResponse>().await?),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(IdentityError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for KeycloakClient {
    async fn init(&self) -> Result<ProviderMetadata, IdentityError> {
        let url = format!("{}/.well-known/openid-configuration", self.realm_url);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, "openid configuration probe failed");
            return Err(IdentityError::Rejected { status, body });
        }

        let metadata: ProviderMetadata = resp.json().await?;
        info!(issuer = %metadata.issuer, "identity provider reachable");
        Ok(metadata)
    }

    fn authorization_url(&self, state: &str, code_challenge: &str) -> Result<Url, IdentityError> {
        let url = Url::parse_with_params(
            &self.endpoint("auth"),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid"),
                ("state", state),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "S256"),
            ],
        )?;
        Ok(url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, IdentityError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, IdentityError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    fn logout_url(&self, id_token_hint: Option<&str>) -> Result<Url, IdentityError> {
        let mut url = Url::parse(&self.endpoint("logout"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.client_id);
            query.append_pair("post_logout_redirect_uri", &self.post_logout_redirect_uri);
            if let Some(hint) = id_token_hint {
                query.append_pair("id_token_hint", hint);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> KeycloakClient {
        KeycloakClient::new(
            reqwest::Client::new(),
            "http://kc.local:9090/",
            "sisgr-realm",
            "sisgr-frontend",
            "http://localhost:3000",
        )
    }

    #[test]
    fn authorization_url_carries_pkce_and_state() {
        let url = client().authorization_url("st-1", "chal-1").unwrap();

        assert_eq!(
            url.path(),
            "/realms/sisgr-realm/protocol/openid-connect/auth"
        );
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("client_id"), Some("sisgr-frontend"));
        assert_eq!(
            get("redirect_uri"),
            Some("http://localhost:3000/auth/callback")
        );
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("state"), Some("st-1"));
        assert_eq!(get("code_challenge"), Some("chal-1"));
        assert_eq!(get("code_challenge_method"), Some("S256"));
    }

    #[test]
    fn logout_url_includes_hint_only_when_known() {
        let with_hint = client().logout_url(Some("idt")).unwrap();
        assert!(with_hint.query().unwrap().contains("id_token_hint=idt"));

        let without = client().logout_url(None).unwrap();
        assert!(!without.query().unwrap().contains("id_token_hint"));
        assert!(
            without
                .query()
                .unwrap()
                .contains("post_logout_redirect_uri=http%3A%2F%2Flocalhost%3A3000%2F")
        );
    }
}
