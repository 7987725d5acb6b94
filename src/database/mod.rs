pub mod assert;

use actix_web::web;
use anyhow::Context;
use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{self as diesel_r2d2, ConnectionManager, CustomizeConnection},
    SqliteConnection,
};
use r2d2::PooledConnection;

use crate::{auth, models::administrators::AdminData, AppState, DbPool};

pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS administrators (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    image TEXT NOT NULL DEFAULT '',
    speciality TEXT NOT NULL,
    degree TEXT NOT NULL,
    experience TEXT NOT NULL,
    about TEXT NOT NULL,
    available BOOLEAN NOT NULL DEFAULT 1,
    fees BIGINT NOT NULL,
    address TEXT NOT NULL DEFAULT '{}',
    date BIGINT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    image TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '{}',
    gender TEXT NOT NULL,
    dob TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    slot_date TEXT NOT NULL,
    slot_time TEXT NOT NULL,
    user_data TEXT NOT NULL,
    doc_data TEXT NOT NULL,
    amount BIGINT NOT NULL,
    date BIGINT NOT NULL,
    cancelled BOOLEAN NOT NULL DEFAULT 0,
    payment BOOLEAN NOT NULL DEFAULT 0,
    is_completed BOOLEAN NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_appointments_doc ON appointments(doc_id);
CREATE INDEX IF NOT EXISTS idx_appointments_user ON appointments(user_id);

CREATE TABLE IF NOT EXISTS slots (
    doc_id TEXT NOT NULL,
    slot_date TEXT NOT NULL,
    slot_time TEXT NOT NULL,
    appointment_id TEXT NOT NULL,
    PRIMARY KEY (doc_id, slot_date, slot_time)
);
"#;

pub fn get_db_conn(state: &web::Data<AppState>) -> anyhow::Result<DbConn> {
    state.pool.get().context("DB connection")
}

/// Runs `f` on the blocking pool with a pooled connection.
pub async fn run<F, T>(state: &web::Data<AppState>, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut conn = get_db_conn(state)?;
    web::block(move || f(&mut *conn)).await.context("DB error")?
}

/// Writers wait on each other instead of failing with `database is locked`,
/// and readers never block the writer.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel_r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel_r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(diesel_r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .context("Failed to create pool")
}

/// Creates missing tables. Safe to run on every start.
pub fn init_schema(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    conn.batch_execute(SCHEMA).context("Creating schema")
}

/// Makes sure the configured admin account exists.
pub fn seed_admin(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<bool> {
    use crate::schema::administrators;

    let existing = administrators::table
        .filter(administrators::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    if existing > 0 {
        return Ok(false);
    }

    let data = AdminData {
        id: crate::utils::new_id(),
        email: email.to_string(),
        password: auth::hash_password(password, bcrypt_cost)?,
    };
    diesel::insert_into(administrators::table)
        .values(data)
        .execute(conn)
        .context("DB error")?;
    Ok(true)
}
