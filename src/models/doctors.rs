use std::collections::BTreeMap;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::schema::doctors;

#[derive(Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = doctors)]
pub struct DoctorData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: i64,
    pub address: String,
    pub date: i64,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = doctors)]
pub struct UpdateDoctor {
    pub fees: Option<i64>,
    pub address: Option<String>,
    pub available: Option<bool>,
}

impl UpdateDoctor {
    pub fn is_empty(&self) -> bool {
        self.fees.is_none() && self.address.is_none() && self.available.is_none()
    }
}

/// Doctor record as sent to clients. Never carries the password hash.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: i64,
    pub address: Address,
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots_booked: Option<BTreeMap<String, Vec<String>>>,
}

impl DoctorData {
    /// Public listing view: no email, no password.
    pub fn public_profile(&self) -> DoctorProfile {
        DoctorProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: None,
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            available: self.available,
            fees: self.fees,
            address: Address::from_column(&self.address),
            date: self.date,
            slots_booked: None,
        }
    }

    pub fn profile(&self) -> DoctorProfile {
        DoctorProfile {
            email: Some(self.email.clone()),
            ..self.public_profile()
        }
    }
}
