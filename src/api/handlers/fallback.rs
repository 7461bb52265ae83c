//! Unknown routes.
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::views::{Chrome, HtmlTemplate, NotFoundPage};
use crate::config::UnknownRoutePolicy;
use crate::state::AppState;

pub async fn unknown_route(State(state): State<AppState>, uri: Uri) -> Response {
    match state.config.unknown_route_policy {
        UnknownRoutePolicy::RedirectToEntry => Redirect::to("/").into_response(),
        UnknownRoutePolicy::NotFound => {
            let session = state.session.snapshot();
            let page = NotFoundPage {
                chrome: Chrome::for_session(&session),
                path: uri.path().to_string(),
            };
            (StatusCode::NOT_FOUND, HtmlTemplate(page)).into_response()
        }
    }
}
