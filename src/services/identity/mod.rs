//! Identity-provider interface used by the login flow and the request pipeline.
pub mod keycloak;
pub mod pkce;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::services::auth::claims::{self, AccessTokenClaims, ClaimsError};
use crate::services::auth::session::TokenSet;

pub use keycloak::KeycloakClient;
pub use pkce::{LoginAttempts, PkcePair};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid identity provider url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unusable token: {0}")]
    Token(#[from] ClaimsError),
    #[error("no refresh token available")]
    NoRefreshToken,
}

/// Token endpoint response (authorization_code and refresh_token grants).
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl TokenResponse {
    /// Decode the access token and turn the response into session tokens.
    ///
    /// `exp` from the token wins over `expires_in`.
    pub fn into_token_set(self) -> Result<(TokenSet, AccessTokenClaims), IdentityError> {
        let claims = claims::decode_unverified(&self.access_token)?;
        let expires_at = claims.expires_at()?;

        let tokens = TokenSet {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            id_token: self.id_token,
            expires_at,
        };
        if tokens.expires_at < Utc::now() {
            tracing::warn!(expires_at = %tokens.expires_at, "identity provider issued an already expired token");
        }
        Ok((tokens, claims))
    }
}

/// OpenID provider metadata (the subset the console logs).
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    #[serde(default)]
    pub token_endpoint: Option<String>,
}

/// Seam between the console and the identity provider.
///
/// Implementations must be cheap to share (`Arc<dyn IdentityProvider>`).
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Probe the provider at start-up.
    async fn init(&self) -> Result<ProviderMetadata, IdentityError>;

    /// Where to send the operator's browser to log in.
    fn authorization_url(&self, state: &str, code_challenge: &str) -> Result<Url, IdentityError>;

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, IdentityError>;

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, IdentityError>;

    /// Where to send the operator's browser to end the provider session.
    fn logout_url(&self, id_token_hint: Option<&str>) -> Result<Url, IdentityError>;
}
