//! ToolRent backend REST client.
//!
//! All calls go through `ApiClient::execute`, which hands the built request to
//! the auth pipeline before it goes on the wire.
pub mod clients;
pub mod kardex;
pub mod loans;
pub mod reports;
pub mod tariffs;
pub mod tools;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::services::auth::{AuthPipeline, PipelineError};

pub use clients::{Client, ClientStatus, NewClient, UpdateClient};
pub use kardex::{Movement, MovementType};
pub use loans::{Loan, LoanStatus, NewLoan, ReturnLoan};
pub use reports::{LoanReportStatus, ToolUsage};
pub use tariffs::Tariff;
pub use tools::{NewTool, Tool, ToolStatus};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("re-authentication required")]
    ReauthRequired,
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer; `message` is what the backend said, verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("unexpected response from backend: {0}")]
    Decode(String),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::ReauthRequired => ApiError::ReauthRequired,
            PipelineError::InvalidHeader => ApiError::ReauthRequired,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    pipeline: Arc<AuthPipeline>,
}

impl ApiClient {
    pub fn new(base_url: &str, http: reqwest::Client, pipeline: Arc<AuthPipeline>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            pipeline,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Authorize and send; non-2xx answers become `ApiError::Server`.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build()?;
        let request = self.pipeline.prepare(request).await?;

        let method = request.method().clone();
        let url = request.url().clone();
        let resp = self.http.execute(request).await.map_err(|e| {
            warn!(%method, %url, error = %e, "backend request failed");
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(%method, %url, status = status.as_u16(), %message, "backend returned an error");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.execute(self.request(Method::GET, path)).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        Self::decode(resp).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.execute(self.request(method, path).json(body)).await?;
        Self::decode(resp).await
    }

    /// Mutation without a request body (e.g. decommission, pay).
    pub(crate) async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = self.execute(self.request(method, path)).await?;
        Self::decode(resp).await
    }
}

/// What to show the operator for a failed backend call: the `message` field of
/// a JSON body, a bare JSON string, or the raw body. Falls back to the status
/// line when the body is empty.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("message") {
            Some(serde_json::Value::String(m)) if !m.is_empty() => m.clone(),
            _ => trimmed.to_string(),
        },
        Ok(serde_json::Value::String(s)) => s,
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Client is restricted and cannot borrow tools","status":400}"#,
        );
        assert_eq!(msg, "Client is restricted and cannot borrow tools");
    }

    #[test]
    fn raw_body_is_kept_verbatim() {
        let msg = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error interno: IllegalStateException - Tool is not available for loan",
        );
        assert_eq!(
            msg,
            "Error interno: IllegalStateException - Tool is not available for loan"
        );

        let json_without_message = r#"{"error":"bad"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, json_without_message),
            json_without_message
        );
    }

    #[test]
    fn json_string_body_is_unquoted() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#""Client with RUT already exists""#),
            "Client with RUT already exists"
        );
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        assert_eq!(error_message(StatusCode::FORBIDDEN, ""), "403 Forbidden");
    }
}
