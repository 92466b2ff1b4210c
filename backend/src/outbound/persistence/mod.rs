//! PostgreSQL persistence adapters for the domain-store ports.

mod diesel_address_repository;
mod diesel_contact_repository;
mod diesel_doctor_repository;
mod diesel_hospital_repository;
mod diesel_patient_repository;
mod diesel_specialization_catalog;
mod models;
mod pool;
mod schema;
mod unit_of_work;

pub use diesel_address_repository::DieselAddressRepository;
pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_doctor_repository::DieselDoctorRepository;
pub use diesel_hospital_repository::DieselHospitalRepository;
pub use diesel_patient_repository::DieselPatientRepository;
pub use diesel_specialization_catalog::DieselSpecializationCatalog;
pub use pool::{DbPool, PoolError, PoolSettings};
pub use unit_of_work::UnitOfWork;
