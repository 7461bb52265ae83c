use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    Available,
    Loaned,
    UnderRepair,
    Decommissioned,
    #[serde(other)]
    Unknown,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Available => "AVAILABLE",
            ToolStatus::Loaned => "LOANED",
            ToolStatus::UnderRepair => "UNDER_REPAIR",
            ToolStatus::Decommissioned => "DECOMMISSIONED",
            ToolStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "unknown_tool_status")]
    pub status: ToolStatus,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub replacement_value: Option<i64>,
}

fn unknown_tool_status() -> ToolStatus {
    ToolStatus::Unknown
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTool {
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub replacement_value: i64,
}

#[derive(Serialize)]
struct StockAdjustment {
    delta: i64,
}

impl ApiClient {
    pub async fn list_tools(&self) -> Result<Vec<Tool>, ApiError> {
        self.get_json("/tools").await
    }

    pub async fn get_tool(&self, id: i64) -> Result<Tool, ApiError> {
        self.get_json(&format!("/tools/{id}")).await
    }

    pub async fn create_tool(&self, tool: &NewTool) -> Result<Tool, ApiError> {
        self.send_json(Method::POST, "/tools", tool).await
    }

    pub async fn decommission_tool(&self, id: i64) -> Result<Tool, ApiError> {
        self.send_empty(Method::PUT, &format!("/tools/{id}/decommission"))
            .await
    }

    /// Add (positive) or remove (negative) units.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> Result<Tool, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/tools/{id}/stock"),
            &StockAdjustment { delta },
        )
        .await
    }
}
