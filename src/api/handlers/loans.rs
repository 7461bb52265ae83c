/*
 * Responsibility
 * - GET /loans, /loans/add, /loans/return/{id} (ADMIN or USER)
 * - POST /loans/add, /loans/return/{id}, /loans/{id}/pay
 */
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::api::dto::NoticeQuery;
use crate::api::dto::loans::{LoanForm, ReturnForm};
use crate::api::extractors::CurrentSession;
use crate::api::handlers::redirect_with_notice;
use crate::api::views::{Chrome, Choice, HtmlTemplate, LoanFormPage, LoanReturnPage, LoanRow, LoansPage};
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

async fn render_list(state: &AppState, chrome: Chrome) -> Result<Response, AppError> {
    let (chrome, loans) = match state.api.list_loans().await {
        Ok(loans) => (chrome, loans.iter().map(LoanRow::from).collect()),
        Err(e) => (chrome.with_error(form_error(e)?), Vec::new()),
    };
    Ok(HtmlTemplate(LoansPage { chrome, loans }).into_response())
}

pub async fn add_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    render_form(&state, &session, &LoanForm::default(), "").await
}

/// The loan form lists every client and tool; the backend decides which of
/// them may take part in a loan.
async fn render_form(
    state: &AppState,
    session: &Session,
    form: &LoanForm,
    error: &str,
) -> Result<Response, AppError> {
    let mut chrome = Chrome::for_session(session).with_error(error);

    let clients = match state.api.list_clients().await {
        Ok(clients) => clients
            .iter()
            .map(|c| Choice {
                value: c.id.to_string(),
                label: format!("{} ({})", c.name, c.status.as_str()),
                selected: form.client_id == c.id.to_string(),
            })
            .collect(),
        Err(e) => {
            chrome = chrome.with_error(form_error(e)?);
            Vec::new()
        }
    };
    let tools = match state.api.list_tools().await {
        Ok(tools) => tools
            .iter()
            .map(|t| Choice {
                value: t.id.to_string(),
                label: format!("{} ({})", t.name, t.status.as_str()),
                selected: form.tool_id == t.id.to_string(),
            })
            .collect(),
        Err(e) => {
            chrome = chrome.with_error(form_error(e)?);
            Vec::new()
        }
    };

    Ok(HtmlTemplate(LoanFormPage {
        chrome,
        clients,
        tools,
        due_date: form.due_date.clone(),
    })
    .into_response())
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<LoanForm>,
) -> Result<Response, AppError> {
    let new_loan = match form.validate() {
        Ok(l) => l,
        Err(msg) => return render_form(&state, &session, &form, &msg).await,
    };

    match state.api.create_loan(&new_loan).await {
        Ok(loan) => {
            tracing::info!(
                loan_id = loan.id,
                client_id = new_loan.client_id,
                tool_id = new_loan.tool_id,
                "loan created"
            );
            Ok(redirect_with_notice("/loans", &format!("Loan #{} created", loan.id)).into_response())
        }
        Err(e) => {
            let msg = form_error(e)?;
            render_form(&state, &session, &form, &msg).await
        }
    }
}

pub async fn return_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let loan = state.api.get_loan(id).await?;
    Ok(HtmlTemplate(LoanReturnPage {
        chrome: Chrome::for_session(&session),
        loan: LoanRow::from(&loan),
        return_date: String::new(),
        damaged: false,
        irreparable: false,
    })
    .into_response())
}

pub async fn return_loan(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let error = match form.validate() {
        Ok(ret) => match state.api.return_loan(id, &ret).await {
            Ok(loan) => {
                tracing::info!(loan_id = id, status = loan.status.as_str(), "loan returned");
                let notice = format!("Loan #{id} returned ({})", loan.status.as_str());
                return Ok(redirect_with_notice("/loans", &notice).into_response());
            }
            Err(e) => form_error(e)?,
        },
        Err(msg) => msg,
    };

    // The return error is what the operator needs; if the loan cannot be
    // re-read, show it over the loan list instead.
    let loan = match state.api.get_loan(id).await {
        Ok(loan) => loan,
        Err(e) => {
            let reread = form_error(e)?;
            tracing::warn!(loan_id = id, error = %reread, "loan re-read failed after rejected return");
            let chrome = Chrome::for_session(&session).with_error(error);
            return render_list(&state, chrome).await;
        }
    };
    Ok(HtmlTemplate(LoanReturnPage {
        chrome: Chrome::for_session(&session).with_error(error),
        loan: LoanRow::from(&loan),
        return_date: form.return_date.clone(),
        damaged: form.damaged(),
        irreparable: form.irreparable(),
    })
    .into_response())
}

pub async fn pay(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match state.api.pay_loan(id).await {
        Ok(client) => {
            tracing::info!(loan_id = id, client_id = client.id, "loan penalty paid");
            let notice = format!(
                "Payment recorded for loan #{id}. Client status: {}",
                client.status.as_str()
            );
            Ok(redirect_with_notice("/loans", &notice).into_response())
        }
        Err(e) => {
            let chrome = Chrome::for_session(&session).with_error(form_error(e)?);
            render_list(&state, chrome).await
        }
    }
}
