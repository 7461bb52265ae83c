use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::clients::Client;
use super::tools::Tool;
use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Late,
    Returned,
    Closed,
    #[serde(other)]
    Unknown,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Late => "LATE",
            LoanStatus::Returned => "RETURNED",
            LoanStatus::Closed => "CLOSED",
            LoanStatus::Unknown => "UNKNOWN",
        }
    }

    /// Loans that are still out and can be returned.
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Late)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "unknown_loan_status")]
    pub status: LoanStatus,
    #[serde(default)]
    pub total_penalty: Option<f64>,
}

fn unknown_loan_status() -> LoanStatus {
    LoanStatus::Unknown
}

impl Loan {
    /// Closed with a penalty still owed.
    pub fn has_unpaid_penalty(&self) -> bool {
        self.status == LoanStatus::Closed && self.total_penalty.is_some_and(|p| p > 0.0)
    }

    pub fn client_id(&self) -> Option<i64> {
        self.client.as_ref().map(|c| c.id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub client_id: i64,
    pub tool_id: i64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLoan {
    pub return_date: NaiveDate,
    pub damaged: bool,
    pub irreparable: bool,
}

impl ApiClient {
    /// Active and late loans.
    pub async fn list_loans(&self) -> Result<Vec<Loan>, ApiError> {
        self.get_json("/loans").await
    }

    pub async fn get_loan(&self, id: i64) -> Result<Loan, ApiError> {
        self.get_json(&format!("/loans/{id}")).await
    }

    pub async fn create_loan(&self, loan: &NewLoan) -> Result<Loan, ApiError> {
        self.send_json(Method::POST, "/loans", loan).await
    }

    pub async fn return_loan(&self, id: i64, ret: &ReturnLoan) -> Result<Loan, ApiError> {
        self.send_json(Method::PUT, &format!("/loans/{id}/return"), ret)
            .await
    }

    /// Mark the penalty of a closed loan as paid. The backend answers with the
    /// client, whose status may have changed.
    pub async fn pay_loan(&self, id: i64) -> Result<Client, ApiError> {
        self.send_empty(Method::PATCH, &format!("/loans/{id}/pay"))
            .await
    }
}
