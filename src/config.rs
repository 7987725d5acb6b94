use std::env;

use anyhow::Context;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_TOKEN_MAX_AGE_SECS: i64 = 7 * 24 * 3600;
const CASHFREE_SANDBOX_API: &str = "https://sandbox.cashfree.com/pg";
const CASHFREE_SANDBOX_CHECKOUT: &str = "https://sandbox.cashfree.com/pg/payment/order";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind: String,
    pub jwt_secret: String,
    pub token_max_age_secs: i64,
    pub bcrypt_cost: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub payment: PaymentConfig,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub app_id: String,
    pub secret_key: String,
    pub base_url: String,
    pub checkout_url: String,
    pub api_version: String,
    pub currency: String,
    pub phone_country_code: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            secret_key: String::new(),
            base_url: CASHFREE_SANDBOX_API.to_string(),
            checkout_url: CASHFREE_SANDBOX_CHECKOUT.to_string(),
            api_version: "2023-08-01".to_string(),
            currency: "INR".to_string(),
            phone_country_code: "+91".to_string(),
        }
    }
}

impl Config {
    /// Reads the process environment; call `dotenv` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = PaymentConfig::default();
        let payment = PaymentConfig {
            app_id: env::var("CASHFREE_APP_ID").unwrap_or_default(),
            secret_key: env::var("CASHFREE_SECRET_KEY").unwrap_or_default(),
            base_url: env::var("CASHFREE_BASE_URL").unwrap_or(defaults.base_url),
            checkout_url: env::var("CASHFREE_CHECKOUT_URL").unwrap_or(defaults.checkout_url),
            api_version: env::var("CASHFREE_API_VERSION").unwrap_or(defaults.api_version),
            currency: env::var("CURRENCY").unwrap_or(defaults.currency),
            phone_country_code: env::var("PHONE_COUNTRY_CODE")
                .unwrap_or(defaults.phone_country_code),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL not found")?,
            bind: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET not found")?,
            token_max_age_secs: parse_var("TOKEN_MAX_AGE_SECS", DEFAULT_TOKEN_MAX_AGE_SECS)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            payment,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
