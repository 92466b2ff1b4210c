//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    addresses, contacts, doctor_qualifications, doctor_specializations, doctors, hospitals,
    patients, specializations,
};

/// Row struct for reading from the addresses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AddressRow {
    pub id: Uuid,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating address rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub id: Uuid,
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub city: &'a str,
    pub postcode: &'a str,
    pub country: &'a str,
}

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating contact rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub phone: &'a str,
}

/// Row struct for reading from the specializations catalog table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = specializations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpecializationRow {
    pub id: Uuid,
    pub name: String,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the doctors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub licence_number: String,
    pub address_id: Uuid,
    pub contact_id: Uuid,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating doctor rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub(crate) struct NewDoctorRow<'a> {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub licence_number: &'a str,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}

/// Changeset struct for whole-row doctor updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = doctors)]
pub(crate) struct DoctorUpdate<'a> {
    pub credential_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub licence_number: &'a str,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}

/// Row struct for reading from the doctor_qualifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctor_qualifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QualificationRow {
    pub id: Uuid,
    #[expect(dead_code, reason = "owning id is implied by the enclosing aggregate")]
    pub doctor_id: Uuid,
    pub title: String,
    pub institution: String,
    pub year_awarded: i32,
}

/// Insertable struct for creating qualification rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctor_qualifications)]
pub(crate) struct NewQualificationRow<'a> {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub title: &'a str,
    pub institution: &'a str,
    pub year_awarded: i32,
}

/// Row struct for the doctor-specialization join table, insertable as-is.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = doctor_specializations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorSpecializationRow {
    pub doctor_id: Uuid,
    pub specialization_id: Uuid,
}

/// Row struct for reading from the patients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub address_id: Uuid,
    pub contact_id: Uuid,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating patient rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
pub(crate) struct NewPatientRow<'a> {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}

/// Changeset struct for whole-row patient updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patients)]
pub(crate) struct PatientUpdate<'a> {
    pub credential_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}

/// Row struct for reading from the hospitals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hospitals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HospitalRow {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub address_id: Uuid,
    pub contact_id: Uuid,
    #[expect(dead_code, reason = "schema field read for completeness, unused by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating hospital rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hospitals)]
pub(crate) struct NewHospitalRow<'a> {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub name: &'a str,
    pub registration_number: &'a str,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}

/// Changeset struct for whole-row hospital updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = hospitals)]
pub(crate) struct HospitalUpdate<'a> {
    pub credential_id: Uuid,
    pub name: &'a str,
    pub registration_number: &'a str,
    pub address_id: Uuid,
    pub contact_id: Uuid,
}
