use std::collections::HashSet;

use anyhow::Context;
use diesel::prelude::*;

use super::responses::DashData;
use crate::models::{
    appointments::{self, AppointmentData},
    doctors::{DoctorData, DoctorProfile},
};

const LATEST_COUNT: usize = 5;

/// Doctor summary computed from the doctor's own appointments, in booking
/// order. Earnings only count completed or paid appointments and saturate
/// rather than overflow. A cancelled appointment cannot be completed, so it
/// only counts once paid.
pub fn dashboard(list: &[AppointmentData]) -> DashData {
    let earnings = list
        .iter()
        .filter(|item| item.is_billable())
        .fold(0i64, |sum, item| sum.saturating_add(item.amount));
    let patients = list
        .iter()
        .map(|item| item.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashData {
        earnings,
        appointments: list.len(),
        patients,
        latest_appointments: appointments::latest(list, LATEST_COUNT),
    }
}

/// Every doctor with their booked slots. Emails are only shown to admins.
pub fn list_doctors(conn: &mut SqliteConnection, with_email: bool) -> anyhow::Result<Vec<DoctorProfile>> {
    use crate::schema::doctors;

    let docs = doctors::table
        .order(doctors::date.asc())
        .load::<DoctorData>(conn)
        .context("DB error")?;
    let mut booked = crate::booking::slots_booked(conn)?;

    Ok(docs
        .iter()
        .map(|doc| {
            let profile = if with_email {
                doc.profile()
            } else {
                doc.public_profile()
            };
            DoctorProfile {
                slots_booked: Some(booked.remove(&doc.id).unwrap_or_default()),
                ..profile
            }
        })
        .collect())
}
