use diesel::prelude::*;

use crate::schema::administrators;

#[derive(Queryable, Insertable)]
#[diesel(table_name = administrators)]
pub struct AdminData {
    pub id: String,
    pub email: String,
    pub password: String,
}
