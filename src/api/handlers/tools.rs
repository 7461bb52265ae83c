/*
 * Responsibility
 * - GET /tools (誰でも), /tools/add (ADMIN)
 * - POST /tools/{id}/decommission, /tools/{id}/stock (ADMIN)
 */
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::api::dto::NoticeQuery;
use crate::api::dto::tools::{StockForm, ToolForm};
use crate::api::extractors::CurrentSession;
use crate::api::handlers::redirect_with_notice;
use crate::api::views::{Chrome, HtmlTemplate, ToolFormPage, ToolRow, ToolsPage};
use crate::error::{AppError, form_error};
use crate::services::auth::Session;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    let chrome = Chrome::for_session(&session).with_notice(q.notice);
    render_list(&state, chrome).await
}

/// Fetch and render the inventory. A failed fetch still renders the page, with
/// the backend message and no rows.
async fn render_list(state: &AppState, chrome: Chrome) -> Result<Response, AppError> {
    let (chrome, tools) = match state.api.list_tools().await {
        Ok(tools) => (chrome, tools.iter().map(ToolRow::from).collect()),
        Err(e) => (chrome.with_error(form_error(e)?), Vec::new()),
    };
    Ok(HtmlTemplate(ToolsPage { chrome, tools }).into_response())
}

pub async fn add_form(CurrentSession(session): CurrentSession) -> HtmlTemplate<ToolFormPage> {
    HtmlTemplate(form_page(&session, &ToolForm::default(), ""))
}

fn form_page(session: &Session, form: &ToolForm, error: &str) -> ToolFormPage {
    ToolFormPage {
        chrome: Chrome::for_session(session).with_error(error),
        name: form.name.clone(),
        category: form.category.clone(),
        stock: form.stock.clone(),
        replacement_value: form.replacement_value.clone(),
    }
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<ToolForm>,
) -> Result<Response, AppError> {
    let new_tool = match form.validate() {
        Ok(t) => t,
        Err(msg) => return Ok(HtmlTemplate(form_page(&session, &form, &msg)).into_response()),
    };

    match state.api.create_tool(&new_tool).await {
        Ok(tool) => {
            tracing::info!(tool_id = tool.id, name = %tool.name, "tool created");
            Ok(redirect_with_notice("/tools", &format!("Tool created: {}", tool.name)).into_response())
        }
        Err(e) => {
            let msg = form_error(e)?;
            Ok(HtmlTemplate(form_page(&session, &form, &msg)).into_response())
        }
    }
}

pub async fn decommission(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match state.api.decommission_tool(id).await {
        Ok(tool) => {
            tracing::info!(tool_id = id, "tool decommissioned");
            Ok(redirect_with_notice("/tools", &format!("Tool decommissioned: {}", tool.name)).into_response())
        }
        Err(e) => {
            let chrome = Chrome::for_session(&session).with_error(form_error(e)?);
            render_list(&state, chrome).await
        }
    }
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Form(form): Form<StockForm>,
) -> Result<Response, AppError> {
    let delta = match form.validate() {
        Ok(d) => d,
        Err(msg) => {
            return render_list(&state, Chrome::for_session(&session).with_error(msg)).await;
        }
    };

    match state.api.adjust_stock(id, delta).await {
        Ok(tool) => {
            tracing::info!(tool_id = id, delta, "tool stock adjusted");
            let stock = tool.stock.map(|s| s.to_string()).unwrap_or_default();
            Ok(redirect_with_notice("/tools", &format!("Stock of {} is now {stock}", tool.name)).into_response())
        }
        Err(e) => {
            let chrome = Chrome::for_session(&session).with_error(form_error(e)?);
            render_list(&state, chrome).await
        }
    }
}
