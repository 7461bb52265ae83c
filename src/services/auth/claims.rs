//! Access-token claims as issued by Keycloak.
//!
//! The console reads the token the way a browser client does: the payload is
//! decoded without signature verification to learn `exp` and the realm roles.
//! The backend is the party that verifies signatures.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::roles::RoleSet;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not a compact JWT")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token 'exp' is out of range")]
    InvalidExp,
}

/// `realm_access` claim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
}

impl AccessTokenClaims {
    pub fn realm_roles(&self) -> RoleSet {
        self.realm_access
            .as_ref()
            .map(|ra| ra.roles.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, ClaimsError> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).ok_or(ClaimsError::InvalidExp)
    }
}

/// Decode the payload segment of a compact JWT.
pub fn decode_unverified(token: &str) -> Result<AccessTokenClaims, ClaimsError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimsError::Malformed);
    };

    // Some issuers pad base64url segments; the JOSE form has no padding.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}
