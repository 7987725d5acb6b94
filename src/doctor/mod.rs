mod requests;
mod responses;
pub(crate) mod utils;

use crate::{
    auth::{self, DoctorSession, Role},
    booking::{self, Actor},
    database::{self, assert},
    error::ApiError,
    models::doctors::{DoctorData, UpdateDoctor},
    protocol::{AppointmentsResponse, SimpleResponse, TokenResponse},
    AppState,
};
use actix_web::{get, post, web, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(doctor_list)
        .service(login_doctor)
        .service(appointments_doctor)
        .service(appointment_complete)
        .service(appointment_cancel)
        .service(doctor_dashboard)
        .service(doctor_profile)
        .service(update_doctor_profile);
}

crate::post_funcs! {
    (login_doctor, "/login", (), LoginRequest, TokenResponse),
    (appointment_complete, "/complete-appointment", DoctorSession, AppointmentRequest, SimpleResponse),
    (appointment_cancel, "/cancel-appointment", DoctorSession, AppointmentRequest, SimpleResponse),
    (update_doctor_profile, "/update-profile", DoctorSession, UpdateProfileRequest, SimpleResponse),
}

crate::get_funcs! {
    (doctor_list, "/list", (), DoctorListResponse),
    (appointments_doctor, "/appointments", DoctorSession, AppointmentsResponse),
    (doctor_dashboard, "/dashboard", DoctorSession, DashboardResponse),
    (doctor_profile, "/profile", DoctorSession, ProfileResponse),
}

async fn doctor_list_impl(state: web::Data<AppState>, _: ()) -> anyhow::Result<DoctorListResponse> {
    let doctors = database::run(&state, |conn| utils::list_doctors(conn, false)).await?;

    Ok(DoctorListResponse {
        success: true,
        message: "".to_string(),
        doctors: Some(doctors),
    })
}

async fn login_doctor_impl(
    state: web::Data<AppState>,
    _: (),
    info: web::Json<LoginRequest>,
) -> anyhow::Result<TokenResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    let did = database::run(&state, move |conn| {
        let doctor = doctors::table
            .filter(doctors::email.eq(&info.email))
            .first::<DoctorData>(conn)
            .optional()
            .context("DB error")?;
        match doctor {
            Some(doctor) if auth::verify_password(&info.password, &doctor.password) => Ok(doctor.id),
            _ => bail!(ApiError::unauthorized("Invalid credentials")),
        }
    })
    .await?;

    Ok(TokenResponse::ok(state.signer.sign(&did, Role::Doctor)?))
}

async fn appointments_doctor_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
) -> anyhow::Result<AppointmentsResponse> {
    let actor = Actor::Doctor(session.id);
    let list = database::run(&state, move |conn| booking::appointments_of(conn, Some(&actor))).await?;

    Ok(AppointmentsResponse::ok(list.iter().map(|item| item.item()).collect()))
}

async fn appointment_complete_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
    info: web::Json<AppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let actor = Actor::Doctor(session.id);
    database::run(&state, move |conn| {
        booking::complete(conn, &info.appointment_id, &actor)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Completed"))
}

async fn appointment_cancel_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
    info: web::Json<AppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let actor = Actor::Doctor(session.id);
    database::run(&state, move |conn| {
        booking::cancel(conn, &info.appointment_id, &actor)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Cancelled"))
}

async fn doctor_dashboard_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
) -> anyhow::Result<DashboardResponse> {
    let actor = Actor::Doctor(session.id);
    let list = database::run(&state, move |conn| booking::appointments_of(conn, Some(&actor))).await?;

    Ok(DashboardResponse {
        success: true,
        message: "".to_string(),
        dash_data: Some(utils::dashboard(&list)),
    })
}

async fn doctor_profile_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
) -> anyhow::Result<ProfileResponse> {
    let doctor = database::run(&state, move |conn| assert::find_doctor(conn, &session.id)).await?;

    Ok(ProfileResponse {
        success: true,
        message: "".to_string(),
        profile_data: Some(doctor.profile()),
    })
}

async fn update_doctor_profile_impl(
    state: web::Data<AppState>,
    session: DoctorSession,
    info: web::Json<UpdateProfileRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    if info.fees.map_or(false, |fees| fees < 0) {
        bail!(ApiError::bad_request("Fees must not be negative"));
    }
    let data = UpdateDoctor {
        fees: info.fees,
        address: info.address.map(|address| address.to_column()),
        available: info.available,
    };

    database::run(&state, move |conn| {
        assert::find_doctor(conn, &session.id)?;
        if !data.is_empty() {
            diesel::update(doctors::table.find(&session.id))
                .set(&data)
                .execute(conn)
                .context("DB error")?;
        }
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Profile Updated"))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::{
        auth::Role,
        booking::{self, Actor},
        database::assert,
        test_utils::*,
    };

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(crate::routes)).await
        };
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_401_without_token() {
        let state = test_state();
        {
            let mut conn = state.pool.get().unwrap();
            insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500);
        }
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/doctor/login")
            .set_json(json!({"email": "rao@clinic.org", "password": "wrong-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body.get("token").is_none());

        let req = test::TestRequest::post()
            .uri("/api/doctor/login")
            .set_json(json!({"email": "nobody@clinic.org", "password": DOCTOR_PASSWORD}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/doctor/login")
            .set_json(json!({"email": "rao@clinic.org", "password": DOCTOR_PASSWORD}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        let token = body["token"].as_str().unwrap();
        assert_eq!(state.signer.verify(token, Role::Doctor).unwrap().role, Role::Doctor);
    }

    #[actix_web::test]
    async fn doctor_list_hides_credentials() {
        let state = test_state();
        let doctor = {
            let mut conn = state.pool.get().unwrap();
            let doctor = insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500);
            let user = insert_user(&mut conn, "Asha", "asha@mail.org");
            booking::book(&mut conn, &user.id, &doctor.id, "16_10_2026", "10:00 AM").unwrap();
            doctor
        };
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/doctor/list").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let listed = &body["doctors"][0];
        assert_eq!(listed["_id"], doctor.id.as_str());
        assert!(listed.get("email").is_none());
        assert!(listed.get("password").is_none());
        assert_eq!(listed["slotsBooked"]["16_10_2026"][0], "10:00 AM");
    }

    #[actix_web::test]
    async fn requests_without_token_are_rejected() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/doctor/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not Authorized Login Again");

        // a patient token is not a doctor token
        let user_token = token(&state, "someone", Role::User);
        let req = test::TestRequest::get()
            .uri("/api/doctor/dashboard")
            .insert_header(("dToken", user_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn doctor_cannot_touch_another_doctors_appointment() {
        let state = test_state();
        let (appointment, other) = {
            let mut conn = state.pool.get().unwrap();
            let doctor = insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500);
            let other = insert_doctor(&mut conn, "Dr. Sen", "sen@clinic.org", 300);
            let user = insert_user(&mut conn, "Asha", "asha@mail.org");
            let appointment =
                booking::book(&mut conn, &user.id, &doctor.id, "16_10_2026", "10:00 AM").unwrap();
            (appointment, other)
        };
        let app = app!(state);
        let other_token = token(&state, &other.id, Role::Doctor);

        for uri in ["/api/doctor/complete-appointment", "/api/doctor/cancel-appointment"] {
            let req = test::TestRequest::post()
                .uri(uri)
                .insert_header(("dToken", other_token.clone()))
                .set_json(json!({"appointmentId": appointment.id}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Unauthorized action");
        }

        let mut conn = state.pool.get().unwrap();
        let stored = assert::find_appointment(&mut conn, &appointment.id).unwrap();
        assert!(!stored.cancelled && !stored.is_completed);
    }

    #[actix_web::test]
    async fn malformed_body_keeps_the_envelope() {
        let state = test_state();
        let doctor = {
            let mut conn = state.pool.get().unwrap();
            insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500)
        };
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/doctor/complete-appointment")
            .insert_header(("dToken", token(&state, &doctor.id, Role::Doctor)))
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("appointmentId"));

        let req = test::TestRequest::post()
            .uri("/api/doctor/login")
            .set_json(json!({"password": DOCTOR_PASSWORD}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body.get("token").is_none());
    }

    #[actix_web::test]
    async fn missing_appointment_is_404() {
        let state = test_state();
        let doctor = {
            let mut conn = state.pool.get().unwrap();
            insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500)
        };
        let app = app!(state);
        let doctor_token = token(&state, &doctor.id, Role::Doctor);

        for uri in ["/api/doctor/complete-appointment", "/api/doctor/cancel-appointment"] {
            let req = test::TestRequest::post()
                .uri(uri)
                .insert_header(("dToken", doctor_token.clone()))
                .set_json(json!({"appointmentId": "does-not-exist"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Appointment not found");
        }
    }

    #[actix_web::test]
    async fn complete_then_dashboard() {
        let state = test_state();
        let (doctor, first) = {
            let mut conn = state.pool.get().unwrap();
            let doctor = insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500);
            let mut paid = appointment("u2", &doctor.id, 300, 2);
            paid.payment = true;
            let first = insert_appointment(&mut conn, appointment("u1", &doctor.id, 500, 1));
            insert_appointment(&mut conn, paid);
            insert_appointment(&mut conn, appointment("u1", &doctor.id, 700, 3));
            insert_appointment(&mut conn, appointment("u9", "another-doctor", 900, 4));
            (doctor, first)
        };
        let app = app!(state);
        let doctor_token = token(&state, &doctor.id, Role::Doctor);

        let req = test::TestRequest::post()
            .uri("/api/doctor/complete-appointment")
            .insert_header(("dToken", doctor_token.clone()))
            .set_json(json!({"appointmentId": first.id}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Appointment Completed");

        let req = test::TestRequest::get()
            .uri("/api/doctor/dashboard")
            .insert_header(("dToken", doctor_token.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let dash = &body["dashData"];
        assert_eq!(dash["earnings"], 800);
        assert_eq!(dash["appointments"], 3);
        assert_eq!(dash["patients"], 2);
        assert_eq!(dash["latestAppointments"][0]["amount"], 700);

        let req = test::TestRequest::get()
            .uri("/api/doctor/appointments")
            .insert_header(("dToken", doctor_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["appointments"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn profile_update_touches_only_its_fields() {
        let state = test_state();
        let doctor = {
            let mut conn = state.pool.get().unwrap();
            insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500)
        };
        let app = app!(state);
        let doctor_token = token(&state, &doctor.id, Role::Doctor);

        let req = test::TestRequest::post()
            .uri("/api/doctor/update-profile")
            .insert_header(("dToken", doctor_token.clone()))
            .set_json(json!({
                "fees": 650,
                "address": {"line1": "2 Hill Road", "line2": "Mumbai"},
                "available": false,
                "name": "Someone Else"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Profile Updated");

        let req = test::TestRequest::get()
            .uri("/api/doctor/profile")
            .insert_header(("dToken", doctor_token.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let profile = &body["profileData"];
        assert_eq!(profile["fees"], 650);
        assert_eq!(profile["available"], false);
        assert_eq!(profile["address"]["line1"], "2 Hill Road");
        assert_eq!(profile["name"], "Dr. Rao");
        assert!(profile.get("password").is_none());

        let req = test::TestRequest::post()
            .uri("/api/doctor/update-profile")
            .insert_header(("dToken", doctor_token))
            .set_json(json!({"fees": -1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn cancel_by_doctor_releases_slot() {
        let state = test_state();
        let (doctor, appointment) = {
            let mut conn = state.pool.get().unwrap();
            let doctor = insert_doctor(&mut conn, "Dr. Rao", "rao@clinic.org", 500);
            let user = insert_user(&mut conn, "Asha", "asha@mail.org");
            let appointment =
                booking::book(&mut conn, &user.id, &doctor.id, "16_10_2026", "10:00 AM").unwrap();
            (doctor, appointment)
        };
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/doctor/cancel-appointment")
            .insert_header(("dToken", token(&state, &doctor.id, Role::Doctor)))
            .set_json(json!({"appointmentId": appointment.id}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Appointment Cancelled");

        let mut conn = state.pool.get().unwrap();
        assert!(booking::slots_booked(&mut conn).unwrap().is_empty());
        let mine = booking::appointments_of(&mut conn, Some(&Actor::Doctor(doctor.id))).unwrap();
        assert!(mine[0].cancelled);
    }
}
