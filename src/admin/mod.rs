mod requests;
mod responses;
mod utils;

use crate::{
    auth::{self, AdminSession, Role},
    booking::{self, Actor},
    database::{self, assert},
    doctor::utils::list_doctors,
    error::ApiError,
    models::administrators::AdminData,
    protocol::{AppointmentsResponse, SimpleResponse, TokenResponse},
    AppState,
};
use actix_web::{get, post, web, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login_admin)
        .service(add_doctor)
        .service(all_doctors)
        .service(change_availability)
        .service(appointments_admin)
        .service(appointment_cancel)
        .service(admin_dashboard);
}

crate::post_funcs! {
    (login_admin, "/login", (), LoginRequest, TokenResponse),
    (add_doctor, "/add-doctor", AdminSession, AddDoctorRequest, SimpleResponse),
    (change_availability, "/change-availability", AdminSession, ChangeAvailabilityRequest, SimpleResponse),
    (appointment_cancel, "/cancel-appointment", AdminSession, AppointmentRequest, SimpleResponse),
}

crate::get_funcs! {
    (all_doctors, "/all-doctors", AdminSession, AllDoctorsResponse),
    (appointments_admin, "/appointments", AdminSession, AppointmentsResponse),
    (admin_dashboard, "/dashboard", AdminSession, DashboardResponse),
}

async fn login_admin_impl(
    state: web::Data<AppState>,
    _: (),
    info: web::Json<LoginRequest>,
) -> anyhow::Result<TokenResponse> {
    use crate::schema::administrators;

    let info = info.into_inner();
    let aid = database::run(&state, move |conn| {
        let admin = administrators::table
            .filter(administrators::email.eq(&info.email))
            .first::<AdminData>(conn)
            .optional()
            .context("DB error")?;
        match admin {
            Some(admin) if auth::verify_password(&info.password, &admin.password) => Ok(admin.id),
            _ => bail!(ApiError::unauthorized("Invalid credentials")),
        }
    })
    .await?;

    Ok(TokenResponse::ok(state.signer.sign(&aid, Role::Admin)?))
}

async fn add_doctor_impl(
    state: web::Data<AppState>,
    _: AdminSession,
    info: web::Json<AddDoctorRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    let bcrypt_cost = state.bcrypt_cost;
    database::run(&state, move |conn| {
        let data = utils::new_doctor(conn, info, bcrypt_cost)?;
        log::info!("Adding doctor {} <{}>", data.id, data.email);
        diesel::insert_into(doctors::table)
            .values(data)
            .execute(conn)
            .context("DB error")?;
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Doctor Added"))
}

async fn all_doctors_impl(
    state: web::Data<AppState>,
    _: AdminSession,
) -> anyhow::Result<AllDoctorsResponse> {
    let doctors = database::run(&state, |conn| list_doctors(conn, true)).await?;

    Ok(AllDoctorsResponse {
        success: true,
        message: "".to_string(),
        doctors: Some(doctors),
    })
}

async fn change_availability_impl(
    state: web::Data<AppState>,
    _: AdminSession,
    info: web::Json<ChangeAvailabilityRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    database::run(&state, move |conn| {
        conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
            let doctor = assert::find_doctor(conn, &info.doc_id)?;
            diesel::update(doctors::table.find(&doctor.id))
                .set(doctors::available.eq(!doctor.available))
                .execute(conn)
                .context("DB error")?;
            log::info!("Doctor {} available: {}", doctor.id, !doctor.available);
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok("Availability Changed"))
}

async fn appointments_admin_impl(
    state: web::Data<AppState>,
    _: AdminSession,
) -> anyhow::Result<AppointmentsResponse> {
    let list = database::run(&state, |conn| booking::appointments_of(conn, None)).await?;

    Ok(AppointmentsResponse::ok(list.iter().map(|item| item.item()).collect()))
}

async fn appointment_cancel_impl(
    state: web::Data<AppState>,
    _: AdminSession,
    info: web::Json<AppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&state, move |conn| {
        booking::cancel(conn, &info.appointment_id, &Actor::Admin)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Cancelled"))
}

async fn admin_dashboard_impl(
    state: web::Data<AppState>,
    _: AdminSession,
) -> anyhow::Result<DashboardResponse> {
    let dash_data = database::run(&state, utils::dashboard).await?;

    Ok(DashboardResponse {
        success: true,
        message: "".to_string(),
        dash_data: Some(dash_data),
    })
}
