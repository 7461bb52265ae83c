/*
 * Responsibility
 * - GET /tariffs, GET/POST /tariffs/edit/{id} (ADMIN)
 */
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::api::dto::NoticeQuery;
use crate::api::dto::tariffs::TariffForm;
use crate::api::extractors::CurrentSession;
use crate::api::handlers::redirect_with_notice;
use crate::api::views::{Chrome, HtmlTemplate, TariffFormPage, TariffRow, TariffsPage};
use crate::error::{AppError, form_error};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<NoticeQuery>,
) -> Result<HtmlTemplate<TariffsPage>, AppError> {
    let chrome = Chrome::for_session(&session).with_notice(q.notice);
    let (chrome, tariffs) = match state.api.list_tariffs().await {
        Ok(tariffs) => (chrome, tariffs.iter().map(TariffRow::from).collect()),
        Err(e) => (chrome.with_error(form_error(e)?), Vec::new()),
    };
    Ok(HtmlTemplate(TariffsPage { chrome, tariffs }))
}

/// The backend exposes no single-tariff read; the edit form picks it out of
/// the list.
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Result<HtmlTemplate<TariffFormPage>, AppError> {
    let tariff = state
        .api
        .list_tariffs()
        .await?
        .into_iter()
        .find(|t| t.id == Some(id))
        .ok_or_else(|| AppError::NotFound(Some(format!("Tariff {id} not found"))))?;
    let row = TariffRow::from(&tariff);

    Ok(HtmlTemplate(TariffFormPage {
        chrome: Chrome::for_session(&session),
        id,
        daily_rent_fee: row.daily_rent_fee,
        daily_late_fee: row.daily_late_fee,
        repair_fee: row.repair_fee,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Form(form): Form<TariffForm>,
) -> Result<Response, AppError> {
    let error = match form.validate(id) {
        Ok(tariff) => match state.api.update_tariff(id, &tariff).await {
            Ok(_) => {
                tracing::info!(tariff_id = id, "tariff updated");
                return Ok(redirect_with_notice("/tariffs", "Tariff updated").into_response());
            }
            Err(e) => form_error(e)?,
        },
        Err(msg) => msg,
    };

    Ok(HtmlTemplate(TariffFormPage {
        chrome: Chrome::for_session(&session).with_error(error),
        id,
        daily_rent_fee: form.daily_rent_fee,
        daily_late_fee: form.daily_late_fee,
        repair_fee: form.repair_fee,
    })
    .into_response())
}
