use serde::Deserialize;

use super::required;
use crate::services::backend::{ClientStatus, NewClient, UpdateClient};

#[derive(Debug, Default, Deserialize)]
pub struct ClientForm {
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl ClientForm {
    pub fn validate_new(&self) -> Result<NewClient, String> {
        Ok(NewClient {
            rut: required(&self.rut, "RUT")?,
            name: required(&self.name, "name")?,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }

    pub fn validate_update(&self) -> Result<UpdateClient, String> {
        Ok(UpdateClient {
            name: required(&self.name, "name")?,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

impl StatusForm {
    pub fn validate(&self) -> Result<ClientStatus, String> {
        match self.status.as_str() {
            "ACTIVE" => Ok(ClientStatus::Active),
            "RESTRICTED" => Ok(ClientStatus::Restricted),
            other => Err(format!("unknown client status: {other}")),
        }
    }
}
