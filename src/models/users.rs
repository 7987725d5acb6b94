use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::schema::users;

pub const DEFAULT_PHONE: &str = "0000000000";
pub const NOT_SELECTED: &str = "Not Selected";

#[derive(Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = users)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub phone: String,
    pub address: String,
    pub gender: String,
    pub dob: String,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub address: Address,
    pub gender: String,
    pub dob: String,
}

impl UserData {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            address: Address::from_column(&self.address),
            gender: self.gender.clone(),
            dob: self.dob.clone(),
        }
    }
}
