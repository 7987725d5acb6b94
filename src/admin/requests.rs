use serde::Deserialize;

use crate::models::Address;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Every field is required; they are optional here so a missing one can be
/// reported as `Missing Details` instead of a body parse error.
#[derive(Deserialize)]
pub struct AddDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub image: String,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<i64>,
    pub address: Option<Address>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvailabilityRequest {
    pub doc_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub appointment_id: String,
}
