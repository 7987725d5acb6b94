use serde::Deserialize;

use crate::models::Address;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub fees: Option<i64>,
    pub address: Option<Address>,
    pub available: Option<bool>,
}
