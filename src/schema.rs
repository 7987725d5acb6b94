diesel::table! {
    administrators (id) {
        id -> Text,
        email -> Text,
        password -> Text,
    }
}

diesel::table! {
    appointments (id) {
        id -> Text,
        user_id -> Text,
        doc_id -> Text,
        slot_date -> Text,
        slot_time -> Text,
        user_data -> Text,
        doc_data -> Text,
        amount -> BigInt,
        date -> BigInt,
        cancelled -> Bool,
        payment -> Bool,
        is_completed -> Bool,
    }
}

diesel::table! {
    doctors (id) {
        id -> Text,
        name -> Text,
        email -> Text,
        password -> Text,
        image -> Text,
        speciality -> Text,
        degree -> Text,
        experience -> Text,
        about -> Text,
        available -> Bool,
        fees -> BigInt,
        address -> Text,
        date -> BigInt,
    }
}

diesel::table! {
    slots (doc_id, slot_date, slot_time) {
        doc_id -> Text,
        slot_date -> Text,
        slot_time -> Text,
        appointment_id -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        name -> Text,
        email -> Text,
        password -> Text,
        image -> Text,
        phone -> Text,
        address -> Text,
        gender -> Text,
        dob -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(administrators, appointments, doctors, slots, users,);
