//! Askama page definitions and the rows they render.
//!
//! Pages receive plain display strings; formatting of backend values happens in
//! the `From` impls below, not in templates.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::nav::{NavLink, menu_for};
use crate::services::auth::{ADMIN, Session};
use crate::services::backend::{Client, ClientStatus, Loan, Movement, Tariff, Tool, ToolStatus};

pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
            }
        }
    }
}

/// Layout data shared by every page: menu, identity, flash messages.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub nav: Vec<NavLink>,
    pub authenticated: bool,
    pub username: String,
    pub is_admin: bool,
    pub notice: String,
    pub error: String,
}

impl Chrome {
    pub fn for_session(session: &Session) -> Self {
        Self {
            nav: menu_for(session),
            authenticated: session.authenticated,
            username: session.username.clone().unwrap_or_default(),
            is_admin: session.authenticated && session.has_role(ADMIN),
            notice: String::new(),
            error: String::new(),
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice.unwrap_or_default();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn money(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.0}")).unwrap_or_default()
}

// ----- public pages -----

#[derive(Template)]
#[template(path = "notice.html")]
pub struct NoticePage {
    pub title: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "forbidden.html")]
pub struct ForbiddenPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub chrome: Chrome,
    pub path: String,
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub chrome: Chrome,
    pub initialized: bool,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub chrome: Chrome,
    pub username: String,
    pub roles: Vec<String>,
    pub expires_at: String,
}

// ----- tools -----

pub struct ToolRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub status: &'static str,
    pub stock: String,
    pub replacement_value: String,
    pub can_decommission: bool,
}

impl From<&Tool> for ToolRow {
    fn from(t: &Tool) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            category: opt(&t.category),
            status: t.status.as_str(),
            stock: opt(&t.stock),
            replacement_value: opt(&t.replacement_value),
            can_decommission: t.status != ToolStatus::Decommissioned,
        }
    }
}

#[derive(Template)]
#[template(path = "tools.html")]
pub struct ToolsPage {
    pub chrome: Chrome,
    pub tools: Vec<ToolRow>,
}

#[derive(Template)]
#[template(path = "tool_form.html")]
pub struct ToolFormPage {
    pub chrome: Chrome,
    pub name: String,
    pub category: String,
    pub stock: String,
    pub replacement_value: String,
}

// ----- loans -----

pub struct LoanRow {
    pub id: i64,
    pub client: String,
    pub tool: String,
    pub start_date: String,
    pub due_date: String,
    pub return_date: String,
    pub status: &'static str,
    pub penalty: String,
    pub can_return: bool,
    pub can_pay: bool,
}

impl From<&Loan> for LoanRow {
    fn from(l: &Loan) -> Self {
        Self {
            id: l.id,
            client: l.client.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            tool: l.tool.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            start_date: opt(&l.start_date),
            due_date: opt(&l.due_date),
            return_date: opt(&l.return_date),
            status: l.status.as_str(),
            penalty: money(l.total_penalty),
            can_return: l.status.is_open(),
            can_pay: l.has_unpaid_penalty(),
        }
    }
}

#[derive(Template)]
#[template(path = "loans.html")]
pub struct LoansPage {
    pub chrome: Chrome,
    pub loans: Vec<LoanRow>,
}

/// A `<select>` entry.
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "loan_form.html")]
pub struct LoanFormPage {
    pub chrome: Chrome,
    pub clients: Vec<Choice>,
    pub tools: Vec<Choice>,
    pub due_date: String,
}

#[derive(Template)]
#[template(path = "loan_return.html")]
pub struct LoanReturnPage {
    pub chrome: Chrome,
    pub loan: LoanRow,
    pub return_date: String,
    pub damaged: bool,
    pub irreparable: bool,
}

// ----- clients -----

pub struct ClientRow {
    pub id: i64,
    pub rut: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: &'static str,
    pub restricted: bool,
    pub toggle_to: &'static str,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id,
            rut: opt(&c.rut),
            name: c.name.clone(),
            phone: opt(&c.phone),
            email: opt(&c.email),
            status: c.status.as_str(),
            restricted: c.status == ClientStatus::Restricted,
            toggle_to: c.status.toggled().as_str(),
        }
    }
}

#[derive(Template)]
#[template(path = "clients.html")]
pub struct ClientsPage {
    pub chrome: Chrome,
    pub clients: Vec<ClientRow>,
}

#[derive(Template)]
#[template(path = "client_form.html")]
pub struct ClientFormPage {
    pub chrome: Chrome,
    pub title: &'static str,
    pub action: String,
    /// RUT is fixed once the client exists.
    pub editing: bool,
    pub rut: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

// ----- reports -----

pub struct ToolUsageRow {
    pub tool: String,
    pub category: String,
    pub count: u64,
}

#[derive(Template)]
#[template(path = "reports.html")]
pub struct ReportsPage {
    pub chrome: Chrome,
    pub kinds: Vec<Choice>,
    pub from: String,
    pub to: String,
    pub show_clients: bool,
    pub show_loans: bool,
    pub show_tools: bool,
    pub clients: Vec<ClientRow>,
    pub loans: Vec<LoanRow>,
    pub tools: Vec<ToolUsageRow>,
}

// ----- tariffs -----

pub struct TariffRow {
    pub id: String,
    pub daily_rent_fee: String,
    pub daily_late_fee: String,
    pub repair_fee: String,
}

impl From<&Tariff> for TariffRow {
    fn from(t: &Tariff) -> Self {
        Self {
            id: opt(&t.id),
            daily_rent_fee: money(Some(t.daily_rent_fee)),
            daily_late_fee: money(Some(t.daily_late_fee)),
            repair_fee: money(t.repair_fee),
        }
    }
}

#[derive(Template)]
#[template(path = "tariffs.html")]
pub struct TariffsPage {
    pub chrome: Chrome,
    pub tariffs: Vec<TariffRow>,
}

#[derive(Template)]
#[template(path = "tariff_form.html")]
pub struct TariffFormPage {
    pub chrome: Chrome,
    pub id: i64,
    pub daily_rent_fee: String,
    pub daily_late_fee: String,
    pub repair_fee: String,
}

// ----- kardex -----

pub struct MovementRow {
    pub id: i64,
    pub date: String,
    pub kind: &'static str,
    pub tool: String,
    pub quantity: String,
    pub user: String,
}

impl From<&Movement> for MovementRow {
    fn from(m: &Movement) -> Self {
        Self {
            id: m.id,
            date: m
                .date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            kind: m.kind.as_str(),
            tool: m.tool.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            quantity: opt(&m.quantity),
            user: m
                .user
                .as_ref()
                .and_then(|u| u.username.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "kardex.html")]
pub struct KardexPage {
    pub chrome: Chrome,
    pub tool_id: String,
    pub movements: Vec<MovementRow>,
}
