/*
 * Responsibility
 * - GET /login: PKCE + state を作って Keycloak へ redirect
 * - GET /auth/callback: code → token 交換, session 確立
 * - POST /logout: session を破棄して end-session endpoint へ redirect
 */
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

pub async fn login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (login_state, pkce) = state.logins.begin().await;
    let url = state
        .identity
        .authorization_url(&login_state, &pkce.challenge)?;

    tracing::debug!("redirecting to identity provider for login");
    Ok(Redirect::to(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub async fn callback(
    State(state): State<AppState>,
    Query(q): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    if let Some(error) = q.error {
        tracing::warn!(%error, description = ?q.error_description, "identity provider refused login");
        return Err(AppError::bad_request(
            q.error_description.unwrap_or(error),
        ));
    }

    let (Some(code), Some(login_state)) = (q.code, q.state) else {
        return Err(AppError::bad_request("missing code or state"));
    };
    let verifier = state
        .logins
        .complete(&login_state)
        .await
        .ok_or_else(|| AppError::bad_request("unknown or expired login attempt"))?;

    let response = state.identity.exchange_code(&code, &verifier).await?;
    let (tokens, claims) = response.into_token_set()?;
    state.session.establish(tokens, &claims);

    tracing::info!(
        username = ?claims.preferred_username,
        roles = ?claims.realm_roles(),
        "operator logged in"
    );
    Ok(Redirect::to("/"))
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let id_token = state.session.current_token().and_then(|t| t.id_token);
    state.session.sign_out();
    tracing::info!("operator logged out");

    let url = state.identity.logout_url(id_token.as_deref())?;
    Ok(Redirect::to(url.as_str()))
}
