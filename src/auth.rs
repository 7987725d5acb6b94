use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use anyhow::{anyhow, Context};
use blake2::{
    digest::{KeyInit, Mac},
    Blake2b512, Blake2bMac512, Digest,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, NOT_AUTHORIZED},
    AppState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    User,
}

impl Role {
    /// Request header carrying this actor's token.
    pub fn header(self) -> &'static str {
        match self {
            Role::Admin => "atoken",
            Role::Doctor => "dtoken",
            Role::User => "token",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub id: String,
    pub role: Role,
    pub iat: i64,
}

/// Issues and checks actor tokens of the form `hex(claims).hex(mac)`.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    max_age_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, max_age_secs: i64) -> Self {
        Self {
            key: Blake2b512::digest(secret.as_bytes()).to_vec(),
            max_age_secs,
        }
    }

    fn mac(&self) -> anyhow::Result<Blake2bMac512> {
        <Blake2bMac512 as KeyInit>::new_from_slice(&self.key).map_err(|_| anyhow!("Bad token key"))
    }

    pub fn sign(&self, id: &str, role: Role) -> anyhow::Result<String> {
        self.sign_claims(&Claims {
            id: id.to_string(),
            role,
            iat: Utc::now().timestamp(),
        })
    }

    pub fn sign_claims(&self, claims: &Claims) -> anyhow::Result<String> {
        let payload = serde_json::to_vec(claims).context("Encoding token")?;
        let mut mac = self.mac()?;
        Mac::update(&mut mac, &payload);
        let tag = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(payload), hex::encode(tag)))
    }

    pub fn verify(&self, token: &str, role: Role) -> Result<Claims, ApiError> {
        let rejected = || ApiError::unauthorized(NOT_AUTHORIZED);

        let (payload, tag) = token.split_once('.').ok_or_else(rejected)?;
        let payload = hex::decode(payload).map_err(|_| rejected())?;
        let tag = hex::decode(tag).map_err(|_| rejected())?;

        let mut mac = self.mac().map_err(|e| ApiError::Internal(e.to_string()))?;
        Mac::update(&mut mac, &payload);
        mac.verify_slice(&tag).map_err(|_| rejected())?;

        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| rejected())?;
        if claims.role != role {
            return Err(rejected());
        }
        if Utc::now().timestamp() - claims.iat > self.max_age_secs {
            return Err(ApiError::unauthorized("Login has expired"));
        }
        Ok(claims)
    }
}

pub fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(password, cost).context("Hashing password")
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

fn claims_from_request(req: &HttpRequest, role: Role) -> Result<Claims, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;
    let token = req
        .headers()
        .get(role.header())
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))?;
    state.signer.verify(token, role)
}

macro_rules! impl_session {
    ( $( $type:ident => $role:expr ),+ $(,)? ) => {
        $(
            /// Verified actor id taken from the request's token header.
            #[derive(Debug, Clone)]
            pub struct $type {
                pub id: String,
            }

            impl FromRequest for $type {
                type Error = ApiError;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(claims_from_request(req, $role).map(|claims| $type { id: claims.id }))
                }
            }
        )+
    };
}

impl_session! {
    AdminSession => Role::Admin,
    DoctorSession => Role::Doctor,
    UserSession => Role::User,
}
