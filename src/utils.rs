/// Expands to `#[post]` handlers that extract the app state, the caller's
/// session and a JSON body, then hand them to `<name>_impl`.
#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $session:ty, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    session: $session,
                    info: web::Json<$request>,
                ) -> impl Responder {
                    $crate::protocol::respond(
                        [<$func_name _impl>](state, session, info).await,
                        |msg| <$response>::err(msg),
                    )
                }
            }
        )+
    };
}

/// Same as `post_funcs!` for body-less `#[get]` handlers.
#[macro_export]
macro_rules! get_funcs {
    ( $( ( $func_name:ident, $url:expr, $session:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[get($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    session: $session,
                ) -> impl Responder {
                    $crate::protocol::respond(
                        [<$func_name _impl>](state, session).await,
                        |msg| <$response>::err(msg),
                    )
                }
            }
        )+
    };
}

use anyhow::bail;
use chrono::{NaiveDate, Utc};

use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 8;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Checks shared by patient registration and doctor creation.
pub fn assert_credentials(email: &str, password: &str) -> anyhow::Result<()> {
    if !is_valid_email(email) {
        bail!(ApiError::bad_request("Please enter a valid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!(ApiError::bad_request("Please enter a strong password"));
    }
    Ok(())
}

/// Parses a `day_month_year` slot date such as `16_10_2026`.
pub fn parse_slot_date(slot_date: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(slot_date, "%d_%m_%Y")
        .map_err(|_| ApiError::bad_request(format!("Invalid slot date '{}'", slot_date)).into())
}

/// `16_10_2026` -> `16 Oct 2026`.
pub fn format_slot_date(slot_date: &str) -> anyhow::Result<String> {
    use chrono::Datelike;

    let date = parse_slot_date(slot_date)?;
    Ok(format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jane@clinic.org"));
        assert!(is_valid_email("a.b+c@mail.example.com"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("@clinic.org"));
        assert!(!is_valid_email("jane@clinic"));
        assert!(!is_valid_email("jane@@clinic.org"));
        assert!(!is_valid_email("jane doe@clinic.org"));
    }

    #[test]
    fn weak_password_is_bad_request() {
        let err = assert_credentials("jane@clinic.org", "short").unwrap_err();
        assert_eq!(
            ApiError::status_of(&err),
            actix_web::http::StatusCode::BAD_REQUEST
        );
        assert!(assert_credentials("jane@clinic.org", "long enough").is_ok());
    }

    #[test]
    fn slot_dates() {
        assert_eq!(
            parse_slot_date("1_2_2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
        );
        assert_eq!(format_slot_date("16_10_2026").unwrap(), "16 Oct 2026");
        assert!(parse_slot_date("31_2_2026").is_err());
        assert!(parse_slot_date("2026-10-16").is_err());
    }
}
