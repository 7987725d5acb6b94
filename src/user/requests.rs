use serde::Deserialize;

use crate::models::Address;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub dob: Option<String>,
    pub gender: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub slot_date: String,
    #[serde(default)]
    pub slot_time: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub customer_phone: String,
    /// Echoed by older clients; must match the token when present.
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}
