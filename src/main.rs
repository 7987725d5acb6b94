mod admin;
mod auth;
mod booking;
mod config;
mod database;
mod doctor;
mod error;
mod models;
mod payment;
mod protocol;
mod schema;
mod user;
mod utils;

#[cfg(test)]
mod test_utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, SqliteConnection};

use crate::{auth::TokenSigner, config::Config, error::ApiError, payment::CashfreeClient};

type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Shared by every worker; handed to handlers as `web::Data<AppState>`.
pub struct AppState {
    pub pool: DbPool,
    pub signer: TokenSigner,
    pub bcrypt_cost: u32,
    pub payments: CashfreeClient,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            signer: TokenSigner::new(&config.jwt_secret, config.token_max_age_secs),
            bcrypt_cost: config.bcrypt_cost,
            payments: CashfreeClient::new(config.payment.clone()),
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    // malformed bodies get the same envelope as handler errors
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _| ApiError::bad_request(err).into()),
    )
    .service(web::scope("/api/user").configure(user::config))
    .service(web::scope("/api/doctor").configure(doctor::config))
    .service(web::scope("/api/admin").configure(admin::config));
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = database::build_pool(&config.database_url, 8)?;
    {
        let mut conn = pool.get().context("DB connection")?;
        database::init_schema(&mut conn)?;
        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            if database::seed_admin(&mut conn, email, password, config.bcrypt_cost)? {
                log::info!("Created admin account {}", email);
            }
        }
    }

    let state = web::Data::new(AppState::new(pool, &config));
    log::info!("Listening on {}", config.bind);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(&config.bind)?
    .run()
    .await
    .context("Server error")
}
