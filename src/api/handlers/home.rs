/*
 * Responsibility
 * - GET / (public landing: menu, login/logout)
 * - GET /profile (username, roles, token expiry)
 */
use axum::extract::{Query, State};

use crate::api::dto::NoticeQuery;
use crate::api::extractors::CurrentSession;
use crate::api::views::{Chrome, HtmlTemplate, LandingPage, ProfilePage};
use crate::state::AppState;

pub async fn landing(
    State(state): State<AppState>,
    Query(q): Query<NoticeQuery>,
) -> HtmlTemplate<LandingPage> {
    let session = state.session.snapshot();
    HtmlTemplate(LandingPage {
        chrome: Chrome::for_session(&session).with_notice(q.notice),
        initialized: session.initialized,
    })
}

pub async fn profile(CurrentSession(session): CurrentSession) -> HtmlTemplate<ProfilePage> {
    HtmlTemplate(ProfilePage {
        chrome: Chrome::for_session(&session),
        username: session.username.clone().unwrap_or_default(),
        roles: session.roles.iter().cloned().collect(),
        expires_at: session
            .expires_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default(),
    })
}
