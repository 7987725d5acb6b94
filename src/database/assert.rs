use anyhow::{bail, Context};
use diesel::prelude::*;

use crate::{
    error::ApiError,
    models::{appointments::AppointmentData, doctors::DoctorData, users::UserData},
};

pub fn find_doctor(conn: &mut SqliteConnection, id: &str) -> anyhow::Result<DoctorData> {
    use crate::schema::doctors;

    doctors::table
        .find(id)
        .get_result::<DoctorData>(conn)
        .optional()
        .context("DB error")?
        .ok_or_else(|| ApiError::not_found("Doctor not found").into())
}

pub fn find_user(conn: &mut SqliteConnection, id: &str) -> anyhow::Result<UserData> {
    use crate::schema::users;

    users::table
        .find(id)
        .get_result::<UserData>(conn)
        .optional()
        .context("DB error")?
        .ok_or_else(|| ApiError::not_found("User not found").into())
}

pub fn find_appointment(conn: &mut SqliteConnection, id: &str) -> anyhow::Result<AppointmentData> {
    use crate::schema::appointments;

    appointments::table
        .find(id)
        .get_result::<AppointmentData>(conn)
        .optional()
        .context("DB error")?
        .ok_or_else(|| {
            log::info!("Appointment not found: {}", id);
            ApiError::not_found("Appointment not found").into()
        })
}

pub fn assert_doctor_email_free(conn: &mut SqliteConnection, email: &str) -> anyhow::Result<()> {
    use crate::schema::doctors;

    let res = doctors::table
        .filter(doctors::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    if res > 0 {
        bail!(ApiError::conflict("Doctor with this email already exists"));
    }
    Ok(())
}

pub fn assert_user_email_free(conn: &mut SqliteConnection, email: &str) -> anyhow::Result<()> {
    use crate::schema::users;

    let res = users::table
        .filter(users::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    if res > 0 {
        bail!(ApiError::conflict("User already exists"));
    }
    Ok(())
}
