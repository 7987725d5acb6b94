use anyhow::bail;
use diesel::prelude::*;

use super::requests::{RegisterRequest, UpdateProfileRequest};
use crate::{
    auth,
    database::assert,
    error::ApiError,
    models::{
        users::{UpdateUser, UserData, DEFAULT_PHONE, NOT_SELECTED},
        Address,
    },
    payment,
    utils::{assert_credentials, new_id},
};

pub const INVALID_PHONE: &str = "Please enter a valid phone number, e.g. +919090407368 or 9090407368";

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Validates a registration form and builds the new account with its
/// defaults. Hashes the password, so run it on the blocking pool.
pub fn new_user(
    conn: &mut SqliteConnection,
    info: RegisterRequest,
    bcrypt_cost: u32,
) -> anyhow::Result<UserData> {
    let (Some(name), Some(email), Some(password)) = (
        required(info.name),
        required(info.email),
        required(info.password),
    ) else {
        bail!(ApiError::bad_request("Missing Details"));
    };

    assert_credentials(&email, &password)?;
    assert::assert_user_email_free(conn, &email)?;

    Ok(UserData {
        id: new_id(),
        name,
        email,
        password: auth::hash_password(&password, bcrypt_cost)?,
        image: String::new(),
        phone: DEFAULT_PHONE.to_string(),
        address: Address::default().to_column(),
        gender: NOT_SELECTED.to_string(),
        dob: NOT_SELECTED.to_string(),
    })
}

/// Name, phone, birth date and gender are mandatory; the address is only
/// replaced when sent.
pub fn profile_changes(info: UpdateProfileRequest) -> anyhow::Result<UpdateUser> {
    let (Some(name), Some(phone), Some(dob), Some(gender)) = (
        required(info.name),
        required(info.phone),
        required(info.dob),
        required(info.gender),
    ) else {
        bail!(ApiError::bad_request("Data Missing"));
    };

    Ok(UpdateUser {
        name: Some(name),
        phone: Some(phone),
        address: info.address.map(|address| address.to_column()),
        gender: Some(gender),
        dob: Some(dob),
    })
}

/// Phone in the form the payment gateway expects, or a 400.
pub fn order_phone(phone: &str, country_code: &str) -> anyhow::Result<String> {
    let normalized = payment::normalize_phone(phone.trim(), country_code);
    if !payment::validate_phone(&normalized) {
        log::warn!("Rejected phone number {:?}", phone);
        bail!(ApiError::bad_request(INVALID_PHONE));
    }
    Ok(normalized)
}
