use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    Active,
    Restricted,
    #[serde(other)]
    Unknown,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "ACTIVE",
            ClientStatus::Restricted => "RESTRICTED",
            ClientStatus::Unknown => "UNKNOWN",
        }
    }

    /// The status an admin toggle moves to.
    pub fn toggled(&self) -> ClientStatus {
        match self {
            ClientStatus::Active => ClientStatus::Restricted,
            _ => ClientStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    #[serde(default)]
    pub rut: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "unknown_client_status")]
    pub status: ClientStatus,
}

fn unknown_client_status() -> ClientStatus {
    ClientStatus::Unknown
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClient {
    pub rut: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateClient {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Serialize)]
struct StatusChange {
    status: ClientStatus,
}

impl ApiClient {
    pub async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get_json("/clients").await
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, ApiError> {
        self.get_json(&format!("/clients/{id}")).await
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client, ApiError> {
        self.send_json(Method::POST, "/clients", client).await
    }

    pub async fn update_client(&self, id: i64, client: &UpdateClient) -> Result<Client, ApiError> {
        self.send_json(Method::PUT, &format!("/clients/{id}"), client)
            .await
    }

    pub async fn set_client_status(
        &self,
        id: i64,
        status: ClientStatus,
    ) -> Result<Client, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/clients/{id}/status"),
            &StatusChange { status },
        )
        .await
    }
}
