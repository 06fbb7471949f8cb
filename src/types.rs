use serde::{Deserialize, Serialize};

/// Inbound message request, accepted form-encoded or as JSON.
/// Fields default to empty so a partial form still produces a value;
/// the relay rejects empty fields itself.
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTokenRequest {
    pub token: String,
    #[serde(rename = "phoneNumberId", default)]
    pub phone_number_id: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}
