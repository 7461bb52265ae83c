use chrono::NaiveDateTime;
use serde::Deserialize;

use super::tools::Tool;
use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Income,
    Loan,
    Return,
    Repair,
    Decommission,
    #[serde(other)]
    Unknown,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Income => "INCOME",
            MovementType::Loan => "LOAN",
            MovementType::Return => "RETURN",
            MovementType::Repair => "REPAIR",
            MovementType::Decommission => "DECOMMISSION",
            MovementType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementUser {
    #[serde(default)]
    pub username: Option<String>,
}

/// One kardex (stock ledger) entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Movement {
    pub id: i64,
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(rename = "type")]
    pub kind: MovementType,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub user: Option<MovementUser>,
}

impl ApiClient {
    pub async fn list_movements(&self) -> Result<Vec<Movement>, ApiError> {
        self.get_json("/kardex").await
    }

    pub async fn list_tool_movements(&self, tool_id: i64) -> Result<Vec<Movement>, ApiError> {
        self.get_json(&format!("/kardex/tool/{tool_id}")).await
    }
}
