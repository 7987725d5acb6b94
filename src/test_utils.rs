use actix_web::web;
use diesel::prelude::*;

use crate::{
    auth::{self, Role},
    config::{Config, PaymentConfig},
    database,
    models::{
        appointments::AppointmentData,
        doctors::DoctorData,
        users::{UserData, NOT_SELECTED},
        Address,
    },
    AppState,
};

pub const DOCTOR_PASSWORD: &str = "doctor-pass";
pub const USER_PASSWORD: &str = "patient-pass";
pub const ADMIN_EMAIL: &str = "admin@clinic.org";
pub const ADMIN_PASSWORD: &str = "admin-pass";
const BCRYPT_COST: u32 = 4;

pub fn test_config(payment: PaymentConfig) -> Config {
    Config {
        database_url: ":memory:".to_string(),
        bind: "127.0.0.1:0".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_max_age_secs: 3600,
        bcrypt_cost: BCRYPT_COST,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        payment,
    }
}

pub fn test_conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    database::init_schema(&mut conn).unwrap();
    conn
}

/// State over a single-connection in-memory pool. Tests must drop any
/// connection they check out before sending a request.
pub fn test_state_with(payment: PaymentConfig) -> web::Data<AppState> {
    let config = test_config(payment);
    let pool = database::build_pool(&config.database_url, 1).unwrap();
    {
        let mut conn = pool.get().unwrap();
        database::init_schema(&mut conn).unwrap();
        database::seed_admin(&mut conn, ADMIN_EMAIL, ADMIN_PASSWORD, BCRYPT_COST).unwrap();
    }
    web::Data::new(AppState::new(pool, &config))
}

pub fn test_state() -> web::Data<AppState> {
    test_state_with(PaymentConfig::default())
}

pub fn token(state: &web::Data<AppState>, id: &str, role: Role) -> String {
    state.signer.sign(id, role).unwrap()
}

pub fn admin_id(conn: &mut SqliteConnection) -> String {
    use crate::schema::administrators;

    administrators::table
        .select(administrators::id)
        .first::<String>(conn)
        .unwrap()
}

pub fn insert_doctor(conn: &mut SqliteConnection, name: &str, email: &str, fees: i64) -> DoctorData {
    use crate::schema::doctors;

    let data = DoctorData {
        id: crate::utils::new_id(),
        name: name.to_string(),
        email: email.to_string(),
        password: auth::hash_password(DOCTOR_PASSWORD, BCRYPT_COST).unwrap(),
        image: String::new(),
        speciality: "General physician".to_string(),
        degree: "MBBS".to_string(),
        experience: "4 Year".to_string(),
        about: "Friendly".to_string(),
        available: true,
        fees,
        address: Address {
            line1: "1 Main Road".to_string(),
            line2: "Pune".to_string(),
        }
        .to_column(),
        date: crate::utils::now_millis(),
    };
    diesel::insert_into(doctors::table)
        .values(data.clone())
        .execute(conn)
        .unwrap();
    data
}

pub fn insert_user(conn: &mut SqliteConnection, name: &str, email: &str) -> UserData {
    use crate::schema::users;

    let data = UserData {
        id: crate::utils::new_id(),
        name: name.to_string(),
        email: email.to_string(),
        password: auth::hash_password(USER_PASSWORD, BCRYPT_COST).unwrap(),
        image: String::new(),
        phone: "9090407368".to_string(),
        address: Address::default().to_column(),
        gender: NOT_SELECTED.to_string(),
        dob: NOT_SELECTED.to_string(),
    };
    diesel::insert_into(users::table)
        .values(data.clone())
        .execute(conn)
        .unwrap();
    data
}

/// Appointment row with explicit flags, bypassing the booking rules.
pub fn appointment(user_id: &str, doc_id: &str, amount: i64, date: i64) -> AppointmentData {
    AppointmentData {
        id: crate::utils::new_id(),
        user_id: user_id.to_string(),
        doc_id: doc_id.to_string(),
        slot_date: "16_10_2026".to_string(),
        slot_time: format!("slot-{}", date),
        user_data: "{}".to_string(),
        doc_data: "{}".to_string(),
        amount,
        date,
        cancelled: false,
        payment: false,
        is_completed: false,
    }
}

pub fn insert_appointment(conn: &mut SqliteConnection, data: AppointmentData) -> AppointmentData {
    use crate::schema::appointments;

    diesel::insert_into(appointments::table)
        .values(data.clone())
        .execute(conn)
        .unwrap();
    data
}
