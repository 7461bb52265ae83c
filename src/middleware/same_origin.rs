//! Cross-site request refusal for state-changing methods.
//!
//! The console acts with one process-wide operator session, so a form posted
//! from another site would run with the operator's token. Browsers label such
//! requests with `Sec-Fetch-Site` and `Origin`; both are checked against
//! `PUBLIC_BASE_URL`. Requests carrying neither header (non-browser clients)
//! pass.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header::ORIGIN},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::views::{HtmlTemplate, NoticePage};

const SEC_FETCH_SITE: &str = "sec-fetch-site";

pub fn apply<S>(router: Router<S>, public_base_url: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let expected: Arc<str> = Arc::from(console_origin(public_base_url).as_str());
    router.layer(middleware::from_fn_with_state(expected, same_origin_middleware))
}

/// `scheme://host[:port]` of the console, as a browser writes it in `Origin`.
pub fn console_origin(public_base_url: &str) -> String {
    match url::Url::parse(public_base_url) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(_) => public_base_url.trim_end_matches('/').to_string(),
    }
}

/// True when `headers` show the request came from a page of another site.
pub fn is_cross_site(headers: &HeaderMap, expected_origin: &str) -> bool {
    if let Some(site) = headers.get(SEC_FETCH_SITE) {
        // "none" is a navigation the operator started (address bar, bookmark).
        if !matches!(site.to_str(), Ok("same-origin") | Ok("none")) {
            return true;
        }
    }
    match headers.get(ORIGIN) {
        Some(origin) => origin.to_str().map_or(true, |o| o != expected_origin),
        None => false,
    }
}

async fn same_origin_middleware(
    State(expected): State<Arc<str>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let safe = matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if safe || !is_cross_site(req.headers(), &expected) {
        return next.run(req).await;
    }

    tracing::warn!(
        method = %req.method(),
        path = %req.uri().path(),
        origin = ?req.headers().get(ORIGIN),
        sec_fetch_site = ?req.headers().get(SEC_FETCH_SITE),
        "cross-site request refused"
    );
    let page = NoticePage {
        title: "Request refused".into(),
        message: "This action must be submitted from the console itself.".into(),
    };
    (StatusCode::FORBIDDEN, HtmlTemplate(page)).into_response()
}
