//! Domain ports and supporting types for the hexagonal boundary.

mod address_repository;
mod aggregate_query;
mod contact_repository;
mod credential_store;
mod doctor_repository;
mod hospital_repository;
mod patient_repository;
mod persistence_error;
mod provisioning_command;
mod specialization_catalog;

#[cfg(test)]
pub use address_repository::MockAddressRepository;
pub use address_repository::AddressRepository;
#[cfg(test)]
pub use aggregate_query::MockAggregateQuery;
pub use aggregate_query::AggregateQuery;
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::ContactRepository;
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError, FixtureCredentialStore};
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
pub use doctor_repository::DoctorRepository;
#[cfg(test)]
pub use hospital_repository::MockHospitalRepository;
pub use hospital_repository::HospitalRepository;
#[cfg(test)]
pub use patient_repository::MockPatientRepository;
pub use patient_repository::PatientRepository;
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use provisioning_command::MockProvisioningCommand;
pub use provisioning_command::{
    AddressDto, AggregateDto, ContactDto, DeprovisionOutcome, DoctorDto, HospitalDto,
    PatientDto, ProfileSpec, ProvisionRequest, ProvisioningCommand, QualificationDto,
    SpecializationDto,
};
#[cfg(test)]
pub use specialization_catalog::MockSpecializationCatalog;
pub use specialization_catalog::{
    FixtureSpecializationCatalog, SpecializationCatalog, SpecializationCatalogError,
};
