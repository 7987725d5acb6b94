use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::protocol::SimpleResponse;

pub const NOT_AUTHORIZED: &str = "Not Authorized Login Again";

/// Failures that map to a specific HTTP status. Anything else surfacing from a
/// handler is reported as 500 with its message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Unauthorized action")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request<S: ToString>(msg: S) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn unauthorized<S: ToString>(msg: S) -> Self {
        Self::Unauthorized(msg.to_string())
    }

    pub fn not_found<S: ToString>(msg: S) -> Self {
        Self::NotFound(msg.to_string())
    }

    pub fn conflict<S: ToString>(msg: S) -> Self {
        Self::Conflict(msg.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_of(err: &anyhow::Error) -> StatusCode {
        err.downcast_ref::<ApiError>()
            .map_or(StatusCode::INTERNAL_SERVER_ERROR, ApiError::status)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(SimpleResponse::err(self))
    }
}
