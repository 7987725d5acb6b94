use serde::Serialize;

use crate::models::{appointments::AppointmentItem, doctors::DoctorProfile};

#[derive(Default, Serialize)]
pub struct AllDoctorsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctors: Option<Vec<DoctorProfile>>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashData {
    pub doctors: i64,
    pub appointments: i64,
    pub patients: i64,
    pub latest_appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_data: Option<DashData>,
}

crate::impl_err_response! {
    AllDoctorsResponse,
    DashboardResponse,
}
