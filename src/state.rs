/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - session / identity provider / backend client / pending logins
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthPipeline, SessionContext};
use crate::services::backend::ApiClient;
use crate::services::identity::{IdentityProvider, LoginAttempts};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: SessionContext,
    pub identity: Arc<dyn IdentityProvider>,
    pub api: ApiClient,
    pub logins: Arc<LoginAttempts>,
}

impl AppState {
    /// Wire the session, the request pipeline and the backend client together.
    /// The session starts uninitialized.
    pub fn new(config: Config, http: reqwest::Client, identity: Arc<dyn IdentityProvider>) -> Self {
        let session = SessionContext::new();
        let pipeline = Arc::new(AuthPipeline::new(
            session.clone(),
            identity.clone(),
            config.token_min_validity_seconds,
        ));
        let api = ApiClient::new(&config.backend_base_url, http, pipeline);

        Self {
            config: Arc::new(config),
            session,
            identity,
            api,
            logins: Arc::new(LoginAttempts::new()),
        }
    }
}
