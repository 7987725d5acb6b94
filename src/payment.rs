use serde::{Deserialize, Serialize};

use crate::{config::PaymentConfig, error::ApiError};

/// Puts a phone number in international form.
///
/// A bare 10-digit local number gets `country_code` prepended, a number that
/// already starts with `+` is kept as typed, anything else becomes `+` and its
/// digits.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 && !phone.starts_with('+') {
        return format!("{}{}", country_code, digits);
    }
    if phone.starts_with('+') {
        return phone.to_string();
    }
    format!("+{}", digits)
}

/// Optional `+` followed by 10 to 15 digits.
pub fn validate_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    customer_id: &'a str,
    customer_phone: &'a str,
}

#[derive(Serialize)]
struct CreateOrder<'a> {
    order_id: String,
    order_amount: i64,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
}

/// What the gateway hands back for a new order. Either field is enough to
/// send the patient to checkout.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GatewayOrder {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, alias = "payment_session_id")]
    pub order_token: Option<String>,
    #[serde(default)]
    pub payment_link: Option<String>,
}

impl GatewayOrder {
    /// Checkout URL: the gateway's own link, or one built from the order token.
    pub fn payment_url(&self, checkout_base: &str) -> Option<String> {
        match (&self.payment_link, &self.order_token) {
            (Some(link), _) if !link.is_empty() => Some(link.clone()),
            (_, Some(token)) if !token.is_empty() => {
                Some(format!("{}/{}", checkout_base.trim_end_matches('/'), token))
            }
            _ => None,
        }
    }
}

/// Server-to-server client for Cashfree-style order creation.
#[derive(Clone)]
pub struct CashfreeClient {
    http: reqwest::Client,
    config: PaymentConfig,
}

impl CashfreeClient {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    pub async fn create_order(
        &self,
        amount: i64,
        customer_id: &str,
        customer_phone: &str,
    ) -> anyhow::Result<GatewayOrder> {
        let body = CreateOrder {
            order_id: format!("order_{}", uuid::Uuid::new_v4().simple()),
            order_amount: amount,
            order_currency: &self.config.currency,
            customer_details: CustomerDetails {
                customer_id,
                customer_phone,
            },
        };
        let url = format!("{}/orders", self.config.base_url.trim_end_matches('/'));

        log::info!("Creating payment order {} for user {}", body.order_id, customer_id);
        let reply = self
            .http
            .post(&url)
            .header("x-client-id", &self.config.app_id)
            .header("x-client-secret", &self.config.secret_key)
            .header("x-api-version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Gateway(e.to_string()))?;

        let status = reply.status();
        if !status.is_success() {
            let text = reply.text().await.unwrap_or_default();
            log::error!("Payment gateway answered {}: {}", status, text);
            return Err(ApiError::Gateway(format!("status {}", status)).into());
        }

        let order = reply
            .json::<GatewayOrder>()
            .await
            .map_err(|e| ApiError::Gateway(e.to_string()))?;
        if order.payment_url(&self.config.checkout_url).is_none() {
            return Err(ApiError::Gateway("no order token or payment link".to_string()).into());
        }
        Ok(order)
    }
}
