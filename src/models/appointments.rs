use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{doctors::DoctorProfile, users::UserProfile};
use crate::schema::appointments;

#[derive(Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = appointments)]
pub struct AppointmentData {
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: String,
    pub doc_data: String,
    pub amount: i64,
    pub date: i64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

/// Appointment as sent to clients, with the booking-time snapshots expanded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserProfile,
    pub doc_data: DoctorProfile,
    pub amount: i64,
    pub date: i64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

impl AppointmentData {
    pub fn item(&self) -> AppointmentItem {
        AppointmentItem {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            doc_id: self.doc_id.clone(),
            slot_date: self.slot_date.clone(),
            slot_time: self.slot_time.clone(),
            user_data: serde_json::from_str(&self.user_data).unwrap_or_default(),
            doc_data: serde_json::from_str(&self.doc_data).unwrap_or_default(),
            amount: self.amount,
            date: self.date,
            cancelled: self.cancelled,
            payment: self.payment,
            is_completed: self.is_completed,
        }
    }

    /// Counts towards earnings once the visit happened or was paid for.
    pub fn is_billable(&self) -> bool {
        self.is_completed || self.payment
    }
}

/// Newest `count` appointments, newest first. Input is in booking order.
pub fn latest(appointments: &[AppointmentData], count: usize) -> Vec<AppointmentItem> {
    appointments
        .iter()
        .rev()
        .take(count)
        .map(AppointmentData::item)
        .collect()
}
