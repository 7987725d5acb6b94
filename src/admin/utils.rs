use anyhow::{bail, Context};
use diesel::prelude::*;

use super::{requests::AddDoctorRequest, responses::DashData};
use crate::{
    auth,
    database::assert,
    error::ApiError,
    models::{appointments::AppointmentData, doctors::DoctorData},
    utils::{assert_credentials, new_id, now_millis},
};

const LATEST_COUNT: i64 = 5;

/// Checks an add-doctor form and turns it into a row. The password is hashed
/// here, so call this off the async executor.
pub fn new_doctor(
    conn: &mut SqliteConnection,
    info: AddDoctorRequest,
    bcrypt_cost: u32,
) -> anyhow::Result<DoctorData> {
    let (name, email, password, speciality, degree, experience, about, fees, address) = match (
        info.name,
        info.email,
        info.password,
        info.speciality,
        info.degree,
        info.experience,
        info.about,
        info.fees,
        info.address,
    ) {
        (
            Some(name),
            Some(email),
            Some(password),
            Some(speciality),
            Some(degree),
            Some(experience),
            Some(about),
            Some(fees),
            Some(address),
        ) if !name.is_empty() && !email.is_empty() && !password.is_empty() => {
            (name, email, password, speciality, degree, experience, about, fees, address)
        }
        _ => bail!(ApiError::bad_request("Missing Details")),
    };

    assert_credentials(&email, &password)?;
    if fees < 0 {
        bail!(ApiError::bad_request("Fees must not be negative"));
    }
    assert::assert_doctor_email_free(conn, &email)?;

    Ok(DoctorData {
        id: new_id(),
        name,
        email,
        password: auth::hash_password(&password, bcrypt_cost)?,
        image: info.image,
        speciality,
        degree,
        experience,
        about,
        available: true,
        fees,
        address: address.to_column(),
        date: now_millis(),
    })
}

pub fn dashboard(conn: &mut SqliteConnection) -> anyhow::Result<DashData> {
    use crate::schema::{appointments, doctors, users};

    let doctors = doctors::table
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    let patients = users::table
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    let total = appointments::table
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    let latest = appointments::table
        .order(appointments::date.desc())
        .limit(LATEST_COUNT)
        .load::<AppointmentData>(conn)
        .context("DB error")?;

    Ok(DashData {
        doctors,
        appointments: total,
        patients,
        latest_appointments: latest.iter().map(|item| item.item()).collect(),
    })
}
