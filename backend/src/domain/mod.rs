//! Domain primitives, aggregates, ports, and the provisioning saga.
//!
//! Purpose: define strongly typed healthcare entities whose state spans two
//! systems of record (a credential half in the identity store, a profile
//! aggregate in the domain store) plus the saga coordinator that creates
//! and destroys both halves as one logical operation. Types are immutable
//! once constructed; invariants and serialisation contracts live in each
//! type's Rustdoc.

pub mod address;
pub mod compensation;
pub mod contact;
pub mod credential;
pub mod doctor;
pub mod entity_kind;
pub mod error;
pub mod hospital;
mod id;
pub mod naming;
pub mod patient;
pub mod ports;
pub mod provisioning_service;
pub mod qualification;
pub mod specialization;

pub use self::address::{Address, AddressId, AddressSpec, AddressValidationError};
pub use self::compensation::{CompensationAction, CompensationLog};
pub use self::contact::{Contact, ContactId, ContactSpec, ContactValidationError};
pub use self::credential::{
    CredentialId, CredentialRecord, CredentialSpec, CredentialValidationError, LoginId, Secret,
};
pub use self::doctor::{DoctorAggregate, DoctorId, DoctorProfileSpec};
pub use self::entity_kind::EntityKind;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hospital::{HospitalAggregate, HospitalId, HospitalProfileSpec};
pub use self::naming::ProfileValidationError;
pub use self::patient::{PatientAggregate, PatientId, PatientProfileSpec};
pub use self::provisioning_service::ProvisioningService;
pub use self::qualification::{
    Qualification, QualificationId, QualificationSpec, QualificationValidationError,
};
pub use self::specialization::{
    Specialization, SpecializationId, SpecializationValidationError,
};

/// Convenient saga result alias.
pub type SagaResult<T> = Result<T, Error>;
