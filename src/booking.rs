//! Appointment lifecycle shared by the patient, doctor and admin handlers.
//!
//! An appointment is created by a booking, then only ever flagged: completed by
//! its doctor, or cancelled by its patient, its doctor or an admin. Cancelling
//! releases the slot so it can be booked again.

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Context};
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use crate::{
    database::assert,
    error::ApiError,
    models::{appointments::AppointmentData, slots::SlotData},
};

/// Who is acting on an appointment, as established by a verified token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Doctor(String),
    User(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Cancel,
    Complete,
}

impl Actor {
    pub fn authorize(
        &self,
        appointment: &AppointmentData,
        action: Action,
    ) -> Result<(), ApiError> {
        let allowed = match (self, action) {
            (Actor::Admin, Action::Cancel) => true,
            (Actor::Admin, Action::Complete) => false,
            (Actor::Doctor(id), _) => appointment.doc_id == *id,
            (Actor::User(id), Action::Cancel) => appointment.user_id == *id,
            (Actor::User(_), Action::Complete) => false,
        };
        if allowed {
            return Ok(());
        }

        match self {
            Actor::Doctor(id) => log::warn!(
                "Doctor ID mismatch: appointment docId {}, request docId {}",
                appointment.doc_id,
                id
            ),
            Actor::User(id) => log::warn!(
                "User ID mismatch: appointment userId {}, request userId {}",
                appointment.user_id,
                id
            ),
            Actor::Admin => log::warn!("Admin may not {:?} appointment {}", action, appointment.id),
        }
        Err(ApiError::Forbidden)
    }
}

/// Takes the slot and records the appointment at the doctor's current fees.
/// The write lock is held from the availability check to the insert, and a
/// slot taken by a concurrent booking still comes back as 409.
pub fn book(
    conn: &mut SqliteConnection,
    user_id: &str,
    doc_id: &str,
    slot_date: &str,
    slot_time: &str,
) -> anyhow::Result<AppointmentData> {
    use crate::schema::{appointments, slots};

    let day = crate::utils::format_slot_date(slot_date)?;
    if slot_time.trim().is_empty() {
        bail!(ApiError::bad_request("Slot time is required"));
    }

    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let doctor = assert::find_doctor(conn, doc_id)?;
        if !doctor.available {
            bail!(ApiError::conflict("Doctor not available"));
        }
        let user = assert::find_user(conn, user_id)?;

        let taken = slots::table
            .filter(slots::doc_id.eq(doc_id))
            .filter(slots::slot_date.eq(slot_date))
            .filter(slots::slot_time.eq(slot_time))
            .count()
            .get_result::<i64>(conn)
            .context("DB error")?;
        if taken > 0 {
            bail!(ApiError::conflict("Slot not available"));
        }

        let appointment = AppointmentData {
            id: crate::utils::new_id(),
            user_id: user.id.clone(),
            doc_id: doctor.id.clone(),
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            user_data: serde_json::to_string(&user.profile()).context("Encoding user")?,
            doc_data: serde_json::to_string(&doctor.profile()).context("Encoding doctor")?,
            amount: doctor.fees,
            date: crate::utils::now_millis(),
            cancelled: false,
            payment: false,
            is_completed: false,
        };

        diesel::insert_into(slots::table)
            .values(SlotData {
                doc_id: doctor.id,
                slot_date: slot_date.to_string(),
                slot_time: slot_time.to_string(),
                appointment_id: appointment.id.clone(),
            })
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ApiError::conflict("Slot not available").into()
                }
                err => anyhow::Error::new(err).context("DB error"),
            })?;
        diesel::insert_into(appointments::table)
            .values(appointment.clone())
            .execute(conn)
            .context("DB error")?;

        log::info!(
            "Appointment {} booked for user {} with doctor {} at {} {}",
            appointment.id,
            appointment.user_id,
            appointment.doc_id,
            day,
            slot_time
        );
        Ok(appointment)
    })
}

/// Flags the appointment cancelled and frees its slot. Cancelling twice is a
/// no-op; a completed appointment is not flagged and answers 409.
pub fn cancel(
    conn: &mut SqliteConnection,
    appointment_id: &str,
    actor: &Actor,
) -> anyhow::Result<()> {
    use crate::schema::{appointments, slots};

    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let appointment = assert::find_appointment(conn, appointment_id)?;
        actor.authorize(&appointment, Action::Cancel)?;
        if appointment.is_completed {
            bail!(ApiError::conflict("Appointment already completed"));
        }
        if appointment.cancelled {
            return Ok(());
        }

        diesel::update(appointments::table.find(appointment_id))
            .set(appointments::cancelled.eq(true))
            .execute(conn)
            .context("DB error")?;
        diesel::delete(
            slots::table
                .filter(slots::doc_id.eq(&appointment.doc_id))
                .filter(slots::slot_date.eq(&appointment.slot_date))
                .filter(slots::slot_time.eq(&appointment.slot_time))
                .filter(slots::appointment_id.eq(&appointment.id)),
        )
        .execute(conn)
        .context("DB error")?;

        log::info!("Appointment {} cancelled by {:?}", appointment_id, actor);
        Ok(())
    })
}

/// Flags the appointment completed once the owner check passes. A cancelled
/// appointment is not flagged and answers 409, so it never reaches earnings.
pub fn complete(
    conn: &mut SqliteConnection,
    appointment_id: &str,
    actor: &Actor,
) -> anyhow::Result<()> {
    use crate::schema::appointments;

    let appointment = assert::find_appointment(conn, appointment_id)?;
    actor.authorize(&appointment, Action::Complete)?;
    if appointment.cancelled {
        bail!(ApiError::conflict("Appointment already cancelled"));
    }

    diesel::update(appointments::table.find(appointment_id))
        .set(appointments::is_completed.eq(true))
        .execute(conn)
        .context("DB error")?;

    log::info!("Appointment {} completed", appointment_id);
    Ok(())
}

/// Appointments in booking order. `None` lists every appointment.
pub fn appointments_of(
    conn: &mut SqliteConnection,
    owner: Option<&Actor>,
) -> anyhow::Result<Vec<AppointmentData>> {
    use crate::schema::appointments;

    let ordered = appointments::table.order(appointments::date.asc());
    match owner {
        Some(Actor::Doctor(id)) => ordered
            .filter(appointments::doc_id.eq(id))
            .load::<AppointmentData>(conn),
        Some(Actor::User(id)) => ordered
            .filter(appointments::user_id.eq(id))
            .load::<AppointmentData>(conn),
        Some(Actor::Admin) | None => ordered.load::<AppointmentData>(conn),
    }
    .context("DB error")
}

/// Booked slot times per doctor, keyed by slot date.
pub fn slots_booked(
    conn: &mut SqliteConnection,
) -> anyhow::Result<HashMap<String, BTreeMap<String, Vec<String>>>> {
    use crate::schema::slots;

    let rows = slots::table
        .order((slots::slot_date.asc(), slots::slot_time.asc()))
        .load::<SlotData>(conn)
        .context("DB error")?;

    let mut booked: HashMap<String, BTreeMap<String, Vec<String>>> = HashMap::new();
    for slot in rows {
        booked
            .entry(slot.doc_id)
            .or_default()
            .entry(slot.slot_date)
            .or_default()
            .push(slot.slot_time);
    }
    Ok(booked)
}
