use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    #[serde(default)]
    pub id: Option<i64>,
    pub daily_rent_fee: f64,
    pub daily_late_fee: f64,
    #[serde(default)]
    pub repair_fee: Option<f64>,
}

impl ApiClient {
    pub async fn list_tariffs(&self) -> Result<Vec<Tariff>, ApiError> {
        self.get_json("/tariffs").await
    }

    pub async fn update_tariff(&self, id: i64, tariff: &Tariff) -> Result<Tariff, ApiError> {
        self.send_json(Method::PUT, &format!("/tariffs/{id}"), tariff)
            .await
    }
}
