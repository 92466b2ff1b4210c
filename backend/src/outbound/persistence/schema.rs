//! Diesel table definitions for the PostgreSQL domain store.
//!
//! These definitions must match the deployed schema exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! There are deliberately no cascade rules behind the aggregate tables:
//! address and contact rows are owned by id and removed explicitly by the
//! saga, never by the database.

diesel::table! {
    /// Postal addresses owned one-to-one by aggregates.
    addresses (id) {
        id -> Uuid,
        line1 -> Varchar,
        line2 -> Nullable<Varchar>,
        city -> Varchar,
        postcode -> Varchar,
        country -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Contact details owned one-to-one by aggregates.
    contacts (id) {
        id -> Uuid,
        email -> Varchar,
        phone -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared specialization catalog; reference data, never cascade-deleted.
    specializations (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Doctor profile rows. `credential_id` is a weak cross-store reference.
    doctors (id) {
        id -> Uuid,
        credential_id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        licence_number -> Varchar,
        address_id -> Uuid,
        contact_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Qualifications owned by a doctor aggregate.
    doctor_qualifications (id) {
        id -> Uuid,
        doctor_id -> Uuid,
        title -> Varchar,
        institution -> Varchar,
        year_awarded -> Int4,
    }
}

diesel::table! {
    /// Join rows linking doctors to catalog specializations.
    doctor_specializations (doctor_id, specialization_id) {
        doctor_id -> Uuid,
        specialization_id -> Uuid,
    }
}

diesel::table! {
    /// Patient profile rows.
    patients (id) {
        id -> Uuid,
        credential_id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        date_of_birth -> Date,
        address_id -> Uuid,
        contact_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hospital profile rows.
    hospitals (id) {
        id -> Uuid,
        credential_id -> Uuid,
        name -> Varchar,
        registration_number -> Varchar,
        address_id -> Uuid,
        contact_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(doctor_qualifications -> doctors (doctor_id));
diesel::joinable!(doctor_specializations -> doctors (doctor_id));
diesel::joinable!(doctor_specializations -> specializations (specialization_id));

diesel::allow_tables_to_appear_in_same_query!(
    addresses,
    contacts,
    specializations,
    doctors,
    doctor_qualifications,
    doctor_specializations,
    patients,
    hospitals,
);
