/*
 * Responsibility
 * - GET /kardex?tool_id= (ADMIN or USER)
 */
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::api::extractors::CurrentSession;
use crate::api::views::{Chrome, HtmlTemplate, KardexPage, MovementRow};
use crate::error::{AppError, form_error};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct KardexQuery {
    #[serde(default)]
    pub tool_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<KardexQuery>,
) -> Result<HtmlTemplate<KardexPage>, AppError> {
    let mut chrome = Chrome::for_session(&session);
    let raw = q.tool_id.unwrap_or_default();
    let raw = raw.trim();

    let fetched = if raw.is_empty() {
        Some(state.api.list_movements().await)
    } else if let Ok(tool_id) = raw.parse::<i64>() {
        Some(state.api.list_tool_movements(tool_id).await)
    } else {
        chrome = chrome.with_error("tool id must be a number");
        None
    };

    let movements = match fetched {
        Some(Ok(movements)) => movements.iter().map(MovementRow::from).collect(),
        Some(Err(e)) => {
            chrome = chrome.with_error(form_error(e)?);
            Vec::new()
        }
        None => Vec::new(),
    };

    Ok(HtmlTemplate(KardexPage {
        chrome,
        tool_id: raw.to_string(),
        movements,
    }))
}
