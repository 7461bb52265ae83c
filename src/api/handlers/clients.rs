/*
 * Responsibility
 * - GET /clients, POST /clients/{id}/pay-dues (ADMIN or USER)
 * - /clients/add, /clients/edit/{id}, POST /clients/{id}/status (ADMIN)
 */
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::api::dto::NoticeQuery;
use crate::api::dto::clients::{ClientForm, StatusForm};
use crate::api::extractors::CurrentSession;
use crate::api::handlers::redirect_with_notice;
use crate::api::views::{Chrome, ClientFormPage, ClientRow, ClientsPage, HtmlTemplate};
use crate::error::{AppError, form_error};
use crate::services::auth::Session;
use crate::services::backend::Loan;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    let chrome = Chrome::for_session(&session).with_notice(q.notice);
    render_list(&state, chrome).await
}

async fn render_list(state: &AppState, chrome: Chrome) -> Result<Response, AppError> {
    let (chrome, clients) = match state.api.list_clients().await {
        Ok(clients) => (chrome, clients.iter().map(ClientRow::from).collect()),
        Err(e) => (chrome.with_error(form_error(e)?), Vec::new()),
    };
    Ok(HtmlTemplate(ClientsPage { chrome, clients }).into_response())
}

fn form_page(
    session: &Session,
    editing: Option<i64>,
    form: &ClientForm,
    error: &str,
) -> HtmlTemplate<ClientFormPage> {
    let (title, action) = match editing {
        Some(id) => ("Edit client", format!("/clients/edit/{id}")),
        None => ("New client", "/clients/add".to_string()),
    };
    HtmlTemplate(ClientFormPage {
        chrome: Chrome::for_session(session).with_error(error),
        title,
        action,
        editing: editing.is_some(),
        rut: form.rut.clone(),
        name: form.name.clone(),
        phone: form.phone.clone(),
        email: form.email.clone(),
    })
}

pub async fn add_form(CurrentSession(session): CurrentSession) -> HtmlTemplate<ClientFormPage> {
    form_page(&session, None, &ClientForm::default(), "")
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<ClientForm>,
) -> Result<Response, AppError> {
    let new_client = match form.validate_new() {
        Ok(c) => c,
        Err(msg) => return Ok(form_page(&session, None, &form, &msg).into_response()),
    };

    match state.api.create_client(&new_client).await {
        Ok(client) => {
            tracing::info!(client_id = client.id, "client created");
            Ok(redirect_with_notice("/clients", &format!("Client registered: {}", client.name)).into_response())
        }
        Err(e) => {
            let msg = form_error(e)?;
            Ok(form_page(&session, None, &form, &msg).into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Result<HtmlTemplate<ClientFormPage>, AppError> {
    let client = state.api.get_client(id).await?;
    let form = ClientForm {
        rut: client.rut.unwrap_or_default(),
        name: client.name,
        phone: client.phone.unwrap_or_default(),
        email: client.email.unwrap_or_default(),
    };
    Ok(form_page(&session, Some(id), &form, ""))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Form(form): Form<ClientForm>,
) -> Result<Response, AppError> {
    let changes = match form.validate_update() {
        Ok(c) => c,
        Err(msg) => return Ok(form_page(&session, Some(id), &form, &msg).into_response()),
    };

    match state.api.update_client(id, &changes).await {
        Ok(client) => {
            tracing::info!(client_id = id, "client updated");
            Ok(redirect_with_notice("/clients", &format!("Client updated: {}", client.name)).into_response())
        }
        Err(e) => {
            let msg = form_error(e)?;
            Ok(form_page(&session, Some(id), &form, &msg).into_response())
        }
    }
}

pub async fn set_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let result = match form.validate() {
        Ok(status) => state
            .api
            .set_client_status(id, status)
            .await
            .map_err(form_error),
        Err(msg) => Err(Ok(msg)),
    };

    match result {
        Ok(client) => {
            tracing::info!(client_id = id, status = client.status.as_str(), "client status changed");
            let notice = format!("Client {} is now {}", client.name, client.status.as_str());
            Ok(redirect_with_notice("/clients", &notice).into_response())
        }
        Err(msg) => {
            let chrome = Chrome::for_session(&session).with_error(msg?);
            render_list(&state, chrome).await
        }
    }
}

/// First closed loan of `client_id` that still owes a penalty.
pub fn first_unpaid_loan(loans: &[Loan], client_id: i64) -> Option<&Loan> {
    loans
        .iter()
        .find(|l| l.client_id() == Some(client_id) && l.has_unpaid_penalty())
}

pub async fn pay_dues(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(client_id): Path<i64>,
) -> Result<Response, AppError> {
    let outcome = match state.api.list_loans().await {
        Ok(loans) => match first_unpaid_loan(&loans, client_id) {
            None => {
                let notice = format!("Client {client_id} has no pending dues.");
                return Ok(redirect_with_notice("/clients", &notice).into_response());
            }
            Some(loan) => {
                let loan_id = loan.id;
                state
                    .api
                    .pay_loan(loan_id)
                    .await
                    .map(|client| (loan_id, client))
            }
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok((loan_id, client)) => {
            tracing::info!(client_id, loan_id, "client dues paid");
            let notice = format!(
                "Payment recorded for loan #{loan_id}. Client status: {}",
                client.status.as_str()
            );
            Ok(redirect_with_notice("/clients", &notice).into_response())
        }
        Err(e) => {
            let chrome = Chrome::for_session(&session).with_error(form_error(e)?);
            render_list(&state, chrome).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loans() -> Vec<Loan> {
        serde_json::from_value(serde_json::json!([
            { "id": 1, "client": { "id": 5, "name": "Ana" }, "status": "LATE", "totalPenalty": 3000.0 },
            { "id": 2, "client": { "id": 5, "name": "Ana" }, "status": "CLOSED", "totalPenalty": 0.0 },
            { "id": 3, "client": { "id": 6, "name": "Luis" }, "status": "CLOSED", "totalPenalty": 800.0 },
            { "id": 4, "client": { "id": 5, "name": "Ana" }, "status": "CLOSED", "totalPenalty": 1200.0 },
            { "id": 5, "client": { "id": 5, "name": "Ana" }, "status": "CLOSED", "totalPenalty": 900.0 }
        ]))
        .unwrap()
    }

    #[test]
    fn picks_first_closed_loan_with_penalty_for_that_client() {
        let loans = loans();
        assert_eq!(first_unpaid_loan(&loans, 5).map(|l| l.id), Some(4));
        assert_eq!(first_unpaid_loan(&loans, 6).map(|l| l.id), Some(3));
        assert!(first_unpaid_loan(&loans, 7).is_none());
    }
}
