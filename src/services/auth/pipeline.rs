//! Outbound request authorization.
//!
//! Every backend request passes through `AuthPipeline::prepare` right before it
//! is sent. The pipeline attaches the operator's bearer token, refreshing it
//! first when it is about to expire. When the token cannot be renewed the
//! session is dropped and the request is not sent.
use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::session::{SessionContext, TokenSet};
use crate::services::identity::{IdentityError, IdentityProvider};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("re-authentication required")]
    ReauthRequired,
    #[error("access token cannot be used as a header value")]
    InvalidHeader,
}

pub struct AuthPipeline {
    session: SessionContext,
    identity: Arc<dyn IdentityProvider>,
    min_validity_seconds: u64,
    // Serializes refreshes so concurrent requests share one token-endpoint call.
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for AuthPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPipeline")
            .field("min_validity_seconds", &self.min_validity_seconds)
            .finish_non_exhaustive()
    }
}

impl AuthPipeline {
    pub fn new(
        session: SessionContext,
        identity: Arc<dyn IdentityProvider>,
        min_validity_seconds: u64,
    ) -> Self {
        Self {
            session,
            identity,
            min_validity_seconds,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Attach credentials to `request`.
    ///
    /// - no session token: returned unchanged
    /// - token valid for at least the look-ahead window: bearer header attached
    /// - token near expiry: refreshed first, then attached
    /// - refresh impossible: re-authentication forced, `ReauthRequired`
    pub async fn prepare(
        &self,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Request, PipelineError> {
        let Some(access_token) = self.valid_access_token().await? else {
            debug!(url = %request.url(), "no session token; sending request without credentials");
            return Ok(request);
        };

        let value = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|_| PipelineError::InvalidHeader)?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(request)
    }

    /// The access token to send, refreshed if needed. `Ok(None)` when there is
    /// no session token at all.
    pub async fn valid_access_token(&self) -> Result<Option<String>, PipelineError> {
        let Some(observed) = self.session.current_token() else {
            return Ok(None);
        };
        if !observed.expires_within(self.min_validity_seconds, Utc::now()) {
            return Ok(Some(observed.access_token));
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have settled things while we waited. Refresh
        // tokens can rotate, so any further refresh starts from the current set.
        let current = match self.session.current_token() {
            None => return Err(PipelineError::ReauthRequired),
            Some(current) if !current.expires_within(self.min_validity_seconds, Utc::now()) => {
                return Ok(Some(current.access_token));
            }
            Some(current) => current,
        };

        match self.refresh(&current).await {
            Ok(access_token) => Ok(Some(access_token)),
            Err(err) => {
                warn!(error = %err, "token refresh failed; forcing re-authentication");
                self.session.require_reauthentication();
                Err(PipelineError::ReauthRequired)
            }
        }
    }

    async fn refresh(&self, current: &TokenSet) -> Result<String, IdentityError> {
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or(IdentityError::NoRefreshToken)?;

        let response = self.identity.refresh(refresh_token).await?;
        let (mut tokens, claims) = response.into_token_set()?;

        // Keycloak may omit tokens it did not rotate.
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = current.refresh_token.clone();
        }
        if tokens.id_token.is_none() {
            tokens.id_token = current.id_token.clone();
        }

        let access_token = tokens.access_token.clone();
        info!(expires_at = %tokens.expires_at, "access token refreshed");
        self.session.replace_tokens(tokens, &claims);
        Ok(access_token)
    }
}
