use actix_web::HttpResponse;
use serde::Serialize;

use crate::{error::ApiError, models::appointments::AppointmentItem};

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl SimpleResponse {
    pub fn ok<S: ToString>(message: S) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(message: S) -> Self {
                    Self {
                        success: false,
                        message: message.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

/// Answer to a successful login or registration.
#[derive(Default, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl TokenResponse {
    pub fn ok(token: String) -> Self {
        Self {
            success: true,
            token,
            ..Default::default()
        }
    }
}

#[derive(Default, Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<AppointmentItem>>,
}

impl AppointmentsResponse {
    pub fn ok(appointments: Vec<AppointmentItem>) -> Self {
        Self {
            success: true,
            appointments: Some(appointments),
            ..Default::default()
        }
    }
}

impl_err_response! {
    SimpleResponse,
    TokenResponse,
    AppointmentsResponse,
}

/// Turns a handler result into the JSON envelope, picking the status from the
/// `ApiError` inside the chain (500 when there is none).
pub fn respond<T, F>(result: anyhow::Result<T>, on_err: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(String) -> T,
{
    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            let status = ApiError::status_of(&err);
            if status.is_server_error() {
                log::error!("{:#}", err);
            } else {
                log::warn!("{:#}", err);
            }
            HttpResponse::build(status).json(on_err(err.to_string()))
        }
    }
}
