use chrono::NaiveDate;
use serde::Deserialize;

use super::clients::Client;
use super::loans::Loan;
use super::tools::Tool;
use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanReportStatus {
    Active,
    Late,
}

impl LoanReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanReportStatus::Active => "ACTIVE",
            LoanReportStatus::Late => "LATE",
        }
    }
}

/// A ranking row: the backend sends `[tool, count]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolUsage(pub Tool, pub u64);

impl ApiClient {
    pub async fn loans_by_status(&self, status: LoanReportStatus) -> Result<Vec<Loan>, ApiError> {
        self.get_json_with_query("/reports/loans", &[("status", status.as_str())])
            .await
    }

    pub async fn clients_with_late_loans(&self) -> Result<Vec<Client>, ApiError> {
        self.get_json("/reports/clients/late").await
    }

    pub async fn top_tools(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ToolUsage>, ApiError> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        self.get_json_with_query(
            "/reports/tools/top",
            &[("from", from.as_str()), ("to", to.as_str())],
        )
        .await
    }
}
