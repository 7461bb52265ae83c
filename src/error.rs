/*
 * Responsibility
 * - console 共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / notice page)
 * - backend / identity の error を統一的に変換
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::views::{HtmlTemplate, NoticePage};
use crate::services::backend::ApiError;
use crate::services::identity::IdentityError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Carries the backend's own wording when it has one.
    #[error("{}", .0.as_deref().unwrap_or("not found"))]
    NotFound(Option<String>),
    /// The session cannot be renewed; the operator must log in again.
    #[error("re-authentication required")]
    ReauthRequired,
    /// The backend refused or failed; shown to the operator as-is.
    #[error("{0}")]
    Backend(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match self {
            AppError::ReauthRequired => return Redirect::to("/login").into_response(),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, "Bad request", message),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                "Not found",
                message.unwrap_or_else(|| "The page you requested does not exist.".to_string()),
            ),
            AppError::Backend(message) => (StatusCode::BAD_GATEWAY, "Backend error", message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "internal server error".to_string(),
            ),
        };

        let page = NoticePage {
            title: title.to_string(),
            message,
        };
        (status, HtmlTemplate(page)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::ReauthRequired => AppError::ReauthRequired,
            ApiError::Server {
                status: 404,
                message,
            } => AppError::NotFound(Some(message)),
            other => AppError::Backend(other.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        tracing::warn!(error = %e, "identity provider call failed");
        match e {
            IdentityError::Rejected { .. } | IdentityError::Token(_) => {
                AppError::bad_request("login could not be completed")
            }
            _ => AppError::Internal,
        }
    }
}

/// Split a backend failure into "show this message in the form" and "leave the
/// page" (re-authentication).
pub fn form_error(e: ApiError) -> Result<String, AppError> {
    match e {
        ApiError::ReauthRequired => Err(AppError::ReauthRequired),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reauth_redirects_to_login() {
        let res = AppError::ReauthRequired.into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/login");
    }

    #[tokio::test]
    async fn backend_404_maps_to_not_found() {
        let err: AppError = ApiError::Server {
            status: 404,
            message: "Tool not found".into(),
        }
        .into();
        assert!(matches!(&err, AppError::NotFound(Some(m)) if m == "Tool not found"));

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Tool not found"));
    }

    #[test]
    fn backend_message_is_kept_verbatim() {
        let err: AppError = ApiError::Server {
            status: 400,
            message: "Client has overdue loans".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Client has overdue loans");
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn form_error_propagates_reauth_only() {
        assert!(matches!(
            form_error(ApiError::ReauthRequired),
            Err(AppError::ReauthRequired)
        ));
        assert_eq!(
            form_error(ApiError::Decode("eof".into())).ok().as_deref(),
            Some("unexpected response from backend: eof")
        );
    }
}
