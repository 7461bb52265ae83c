/*
 * Responsibility
 * - GET /reports?kind=&from=&to= (ADMIN or USER)
 * - LATE_CLIENTS (default) / ACTIVE_LOANS / LATE_LOANS / TOP_TOOLS
 */
use axum::extract::{Query, State};

use crate::api::dto::reports::{ReportKind, ReportQuery};
use crate::api::extractors::CurrentSession;
use crate::api::views::{Chrome, Choice, ClientRow, HtmlTemplate, LoanRow, ReportsPage, ToolUsageRow};
use crate::error::{AppError, form_error};
use crate::services::backend::{ApiError, LoanReportStatus};
use crate::state::AppState;

#[derive(Default)]
struct ReportRows {
    clients: Vec<ClientRow>,
    loans: Vec<LoanRow>,
    tools: Vec<ToolUsageRow>,
}

async fn fetch(state: &AppState, q: &ReportQuery) -> Result<ReportRows, ApiError> {
    let mut rows = ReportRows::default();
    match q.kind {
        ReportKind::LateClients => {
            let clients = state.api.clients_with_late_loans().await?;
            rows.clients = clients.iter().map(ClientRow::from).collect();
        }
        ReportKind::ActiveLoans | ReportKind::LateLoans => {
            let status = if q.kind == ReportKind::ActiveLoans {
                LoanReportStatus::Active
            } else {
                LoanReportStatus::Late
            };
            let loans = state.api.loans_by_status(status).await?;
            rows.loans = loans.iter().map(LoanRow::from).collect();
        }
        ReportKind::TopTools => {
            // The ranking needs both dates; without them nothing is requested.
            if let Some((from, to)) = q.range() {
                let ranking = state.api.top_tools(from, to).await?;
                rows.tools = ranking
                    .into_iter()
                    .map(|usage| ToolUsageRow {
                        tool: usage.0.name,
                        category: usage.0.category.unwrap_or_default(),
                        count: usage.1,
                    })
                    .collect();
            }
        }
    }
    Ok(rows)
}

pub async fn view(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<ReportQuery>,
) -> Result<HtmlTemplate<ReportsPage>, AppError> {
    let mut chrome = Chrome::for_session(&session);
    let rows = match fetch(&state, &q).await {
        Ok(rows) => rows,
        Err(e) => {
            chrome = chrome.with_error(form_error(e)?);
            ReportRows::default()
        }
    };

    let kinds = ReportKind::ALL
        .iter()
        .map(|k| Choice {
            value: k.as_str().to_string(),
            label: k.label().to_string(),
            selected: *k == q.kind,
        })
        .collect();

    Ok(HtmlTemplate(ReportsPage {
        chrome,
        kinds,
        from: q.from.clone().unwrap_or_default(),
        to: q.to.clone().unwrap_or_default(),
        show_clients: q.kind == ReportKind::LateClients,
        show_loans: matches!(q.kind, ReportKind::ActiveLoans | ReportKind::LateLoans),
        show_tools: q.kind == ReportKind::TopTools,
        clients: rows.clients,
        loans: rows.loans,
        tools: rows.tools,
    }))
}
