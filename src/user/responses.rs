use serde::Serialize;

use crate::models::users::UserProfile;

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserProfile>,
}

/// Keys stay snake_case, as the checkout page reads them.
#[derive(Default, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payment_url: String,
}

crate::impl_err_response! {
    ProfileResponse,
    OrderResponse,
}
