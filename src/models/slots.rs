use diesel::prelude::*;

use crate::schema::slots;

#[derive(Queryable, Insertable)]
#[diesel(table_name = slots)]
pub struct SlotData {
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub appointment_id: String,
}
