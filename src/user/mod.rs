mod requests;
mod responses;
mod utils;

use crate::{
    auth::{self, Role, UserSession},
    booking::{self, Actor},
    database::{self, assert},
    error::ApiError,
    models::users::UserData,
    protocol::{AppointmentsResponse, SimpleResponse, TokenResponse},
    AppState,
};
use actix_web::{get, post, web, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register_user)
        .service(login_user)
        .service(get_profile)
        .service(update_profile)
        .service(book_appointment)
        .service(list_appointment)
        .service(cancel_appointment)
        .service(create_cashfree_order);
}

crate::post_funcs! {
    (register_user, "/register", (), RegisterRequest, TokenResponse),
    (login_user, "/login", (), LoginRequest, TokenResponse),
    (update_profile, "/update-profile", UserSession, UpdateProfileRequest, SimpleResponse),
    (book_appointment, "/book-appointment", UserSession, BookAppointmentRequest, SimpleResponse),
    (cancel_appointment, "/cancel-appointment", UserSession, AppointmentRequest, SimpleResponse),
    (create_cashfree_order, "/create-cashfree-order", UserSession, CreateOrderRequest, OrderResponse),
}

crate::get_funcs! {
    (get_profile, "/get-profile", UserSession, ProfileResponse),
    (list_appointment, "/appointments", UserSession, AppointmentsResponse),
}

async fn register_user_impl(
    state: web::Data<AppState>,
    _: (),
    info: web::Json<RegisterRequest>,
) -> anyhow::Result<TokenResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    let bcrypt_cost = state.bcrypt_cost;
    let uid = database::run(&state, move |conn| {
        let data = utils::new_user(conn, info, bcrypt_cost)?;
        diesel::insert_into(users::table)
            .values(&data)
            .execute(conn)
            .context("DB error")?;
        log::info!("Registered user {} <{}>", data.id, data.email);
        Ok(data.id)
    })
    .await?;

    Ok(TokenResponse::ok(state.signer.sign(&uid, Role::User)?))
}

async fn login_user_impl(
    state: web::Data<AppState>,
    _: (),
    info: web::Json<LoginRequest>,
) -> anyhow::Result<TokenResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    let uid = database::run(&state, move |conn| {
        let user = users::table
            .filter(users::email.eq(&info.email))
            .first::<UserData>(conn)
            .optional()
            .context("DB error")?;
        match user {
            Some(user) if auth::verify_password(&info.password, &user.password) => Ok(user.id),
            Some(_) => bail!(ApiError::unauthorized("Invalid credentials")),
            None => bail!(ApiError::unauthorized("User does not exist")),
        }
    })
    .await?;

    Ok(TokenResponse::ok(state.signer.sign(&uid, Role::User)?))
}

async fn get_profile_impl(
    state: web::Data<AppState>,
    session: UserSession,
) -> anyhow::Result<ProfileResponse> {
    let user = database::run(&state, move |conn| assert::find_user(conn, &session.id)).await?;

    Ok(ProfileResponse {
        success: true,
        message: "".to_string(),
        user_data: Some(user.profile()),
    })
}

async fn update_profile_impl(
    state: web::Data<AppState>,
    session: UserSession,
    info: web::Json<UpdateProfileRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::users;

    let changes = utils::profile_changes(info.into_inner())?;
    database::run(&state, move |conn| {
        assert::find_user(conn, &session.id)?;
        diesel::update(users::table.find(&session.id))
            .set(&changes)
            .execute(conn)
            .context("DB error")?;
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Profile Updated"))
}

async fn book_appointment_impl(
    state: web::Data<AppState>,
    session: UserSession,
    info: web::Json<BookAppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&state, move |conn| {
        booking::book(conn, &session.id, &info.doc_id, &info.slot_date, &info.slot_time)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Booked"))
}

async fn list_appointment_impl(
    state: web::Data<AppState>,
    session: UserSession,
) -> anyhow::Result<AppointmentsResponse> {
    let actor = Actor::User(session.id);
    let list = database::run(&state, move |conn| booking::appointments_of(conn, Some(&actor))).await?;

    Ok(AppointmentsResponse::ok(list.iter().map(|item| item.item()).collect()))
}

async fn cancel_appointment_impl(
    state: web::Data<AppState>,
    session: UserSession,
    info: web::Json<AppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let actor = Actor::User(session.id);
    database::run(&state, move |conn| {
        booking::cancel(conn, &info.appointment_id, &actor)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Cancelled"))
}

async fn create_cashfree_order_impl(
    state: web::Data<AppState>,
    session: UserSession,
    info: web::Json<CreateOrderRequest>,
) -> anyhow::Result<OrderResponse> {
    let info = info.into_inner();
    if let Some(claimed) = &info.user_id {
        if *claimed != session.id {
            log::warn!(
                "User ID mismatch: request userId {}, token userId {}",
                claimed,
                session.id
            );
            bail!(ApiError::Forbidden);
        }
    }
    if info.amount <= 0 {
        bail!(ApiError::bad_request("Invalid amount"));
    }

    let payments = &state.payments;
    let phone = utils::order_phone(&info.customer_phone, &payments.config().phone_country_code)?;
    let uid = session.id.clone();
    let user = database::run(&state, move |conn| assert::find_user(conn, &uid)).await?;

    let order = payments.create_order(info.amount, &user.id, &phone).await?;
    let payment_url = order
        .payment_url(&payments.config().checkout_url)
        .unwrap_or_default();

    Ok(OrderResponse {
        success: true,
        message: "".to_string(),
        order_id: order.order_id,
        order_token: order.order_token,
        payment_link: order.payment_link,
        payment_url,
    })
}
