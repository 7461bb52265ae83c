//! Session/role gate for console route groups.
//!
//! Each protected group is wrapped with its own `GuardRule`. The gate reads a
//! fresh session snapshot per request and either answers itself or lets the
//! handler run with that snapshot in the request extensions.
//!
//! ```ignore
//! let admin = Router::new().route("/tariffs", get(tariffs::list));
//! let admin = middleware::auth::gate::apply(admin, &state, guards::admin());
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::views::{Chrome, ForbiddenPage, HtmlTemplate};
use crate::services::auth::{GateOutcome, GuardRule, SessionContext, decide};
use crate::state::AppState;

#[derive(Clone)]
struct Gate {
    session: SessionContext,
    rule: Arc<GuardRule>,
}

/// Gate every route of `router` behind `rule`. Only matched routes are
/// wrapped, so unknown paths still reach the fallback.
pub fn apply(router: Router<AppState>, state: &AppState, rule: GuardRule) -> Router<AppState> {
    let gate = Gate {
        session: state.session.clone(),
        rule: Arc::new(rule),
    };
    router.route_layer(middleware::from_fn_with_state(gate, gate_middleware))
}

async fn gate_middleware(State(gate): State<Gate>, mut req: Request<Body>, next: Next) -> Response {
    let session = gate.session.snapshot();

    match decide(&gate.rule, &session) {
        GateOutcome::Pending => {
            tracing::debug!(path = %req.uri().path(), "session not initialized; rendering nothing");
            StatusCode::NO_CONTENT.into_response()
        }
        GateOutcome::RedirectToEntry => Redirect::to("/").into_response(),
        GateOutcome::Forbidden => {
            tracing::info!(
                path = %req.uri().path(),
                username = ?session.username,
                roles = ?session.roles,
                required = ?gate.rule.required(),
                "route forbidden for current roles"
            );
            let page = ForbiddenPage {
                chrome: Chrome::for_session(&session),
            };
            (StatusCode::FORBIDDEN, HtmlTemplate(page)).into_response()
        }
        GateOutcome::Allow => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
    }
}
