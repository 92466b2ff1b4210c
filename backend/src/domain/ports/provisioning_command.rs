//! Driving port for entity provisioning and deprovisioning.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! run the saga without knowing the backing stores. The request carries the
//! closed set of profile variants; the kind is selected exactly once, by
//! matching the variant at the start of a run.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Address, AddressSpec, Contact, ContactSpec, CredentialId, CredentialSpec,
    DoctorProfileSpec, EntityKind, Error, HospitalProfileSpec, PatientProfileSpec,
    Qualification, Specialization,
};

/// Per-kind profile fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSpec {
    Doctor(DoctorProfileSpec),
    Patient(PatientProfileSpec),
    Hospital(HospitalProfileSpec),
}

impl ProfileSpec {
    /// Entity kind selected by this profile variant.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Doctor(_) => EntityKind::Doctor,
            Self::Patient(_) => EntityKind::Patient,
            Self::Hospital(_) => EntityKind::Hospital,
        }
    }
}

/// Request to provision one entity across both stores.
///
/// Consumed once by the saga; nothing in it is persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub credentials: CredentialSpec,
    pub address: AddressSpec,
    pub contact: ContactSpec,
    pub profile: ProfileSpec,
}

/// Composed address payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub id: Uuid,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl From<Address> for AddressDto {
    fn from(value: Address) -> Self {
        Self {
            id: *value.id.as_uuid(),
            line1: value.spec.line1().to_owned(),
            line2: value.spec.line2().map(str::to_owned),
            city: value.spec.city().to_owned(),
            postcode: value.spec.postcode().to_owned(),
            country: value.spec.country().to_owned(),
        }
    }
}

/// Composed contact payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
}

impl From<Contact> for ContactDto {
    fn from(value: Contact) -> Self {
        Self {
            id: *value.id.as_uuid(),
            email: value.spec.email().to_owned(),
            phone: value.spec.phone().to_owned(),
        }
    }
}

/// Composed qualification payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationDto {
    pub id: Uuid,
    pub title: String,
    pub institution: String,
    pub year_awarded: i32,
}

impl From<Qualification> for QualificationDto {
    fn from(value: Qualification) -> Self {
        Self {
            id: *value.id.as_uuid(),
            title: value.spec.title().to_owned(),
            institution: value.spec.institution().to_owned(),
            year_awarded: value.spec.year_awarded(),
        }
    }
}

/// Resolved specialization reference returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Specialization> for SpecializationDto {
    fn from(value: Specialization) -> Self {
        Self {
            id: *value.id.as_uuid(),
            name: value.name,
        }
    }
}

/// Composed doctor aggregate returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub licence_number: String,
    pub address: AddressDto,
    pub contact: ContactDto,
    pub qualifications: Vec<QualificationDto>,
    pub specializations: Vec<SpecializationDto>,
}

/// Composed patient aggregate returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub address: AddressDto,
    pub contact: ContactDto,
}

/// Composed hospital aggregate returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalDto {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub address: AddressDto,
    pub contact: ContactDto,
}

/// Composed aggregate payload, tagged by entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateDto {
    Doctor(DoctorDto),
    Patient(PatientDto),
    Hospital(HospitalDto),
}

impl AggregateDto {
    /// Entity kind of the composed payload.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Doctor(_) => EntityKind::Doctor,
            Self::Patient(_) => EntityKind::Patient,
            Self::Hospital(_) => EntityKind::Hospital,
        }
    }

    /// Aggregate identifier of the composed payload.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Doctor(dto) => dto.id,
            Self::Patient(dto) => dto.id,
            Self::Hospital(dto) => dto.id,
        }
    }

    /// Credential identifier referenced by the composed payload.
    pub fn credential_id(&self) -> CredentialId {
        match self {
            Self::Doctor(dto) => CredentialId::from_uuid(dto.credential_id),
            Self::Patient(dto) => CredentialId::from_uuid(dto.credential_id),
            Self::Hospital(dto) => CredentialId::from_uuid(dto.credential_id),
        }
    }
}

/// Outcome of a deprovisioning run.
///
/// `NotFound` is a normal outcome, not an error: deprovisioning an already
/// removed entity is an idempotent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeprovisionOutcome {
    /// Both halves of the entity were removed.
    Removed {
        kind: EntityKind,
        id: Uuid,
        message: String,
    },
    /// No aggregate exists for the id.
    NotFound,
}

/// Driving port for the provisioning saga.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningCommand: Send + Sync {
    /// Provision one entity: credential, address, contact, and aggregate.
    async fn provision(&self, request: ProvisionRequest) -> Result<AggregateDto, Error>;

    /// Deprovision one entity: aggregate, address, contact, and credential.
    async fn deprovision(
        &self,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<DeprovisionOutcome, Error>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AddressId, ContactId, QualificationId, QualificationSpec};
    use rstest::rstest;

    #[rstest]
    fn profile_spec_selects_kind_once() {
        let doctor = ProfileSpec::Doctor(
            DoctorProfileSpec::new("Gregory", "House", "GMC-1", vec![], vec![])
                .expect("valid profile spec"),
        );
        assert_eq!(doctor.kind(), EntityKind::Doctor);

        let hospital = ProfileSpec::Hospital(
            HospitalProfileSpec::new("St. Mary's", "CQC-1").expect("valid profile spec"),
        );
        assert_eq!(hospital.kind(), EntityKind::Hospital);
    }

    #[rstest]
    fn dto_conversions_copy_all_fields() {
        let address = Address::new(
            AddressId::random(),
            AddressSpec::new("1 Main St", Some("Suite 4"), "Leeds", "LS1", "UK")
                .expect("valid address spec"),
        );
        let dto = AddressDto::from(address.clone());
        assert_eq!(dto.id, *address.id.as_uuid());
        assert_eq!(dto.line2.as_deref(), Some("Suite 4"));

        let contact = Contact::new(
            ContactId::random(),
            ContactSpec::new("a@x.com", "0201234567").expect("valid contact spec"),
        );
        let dto = ContactDto::from(contact.clone());
        assert_eq!(dto.email, "a@x.com");

        let qualification = Qualification::new(
            QualificationId::random(),
            QualificationSpec::new("MD", "Johns Hopkins", 1989).expect("valid spec"),
        );
        let dto = QualificationDto::from(qualification);
        assert_eq!(dto.title, "MD");
        assert_eq!(dto.year_awarded, 1989);
    }

    #[rstest]
    fn aggregate_dto_serialises_with_kind_tag() {
        let dto = AggregateDto::Hospital(HospitalDto {
            id: Uuid::new_v4(),
            credential_id: Uuid::new_v4(),
            name: "St. Mary's".to_owned(),
            registration_number: "CQC-1".to_owned(),
            address: AddressDto {
                id: Uuid::new_v4(),
                line1: "1 Main St".to_owned(),
                line2: None,
                city: "Leeds".to_owned(),
                postcode: "LS1".to_owned(),
                country: "UK".to_owned(),
            },
            contact: ContactDto {
                id: Uuid::new_v4(),
                email: "a@x.com".to_owned(),
                phone: "0201234567".to_owned(),
            },
        });

        let encoded = serde_json::to_value(&dto).expect("dto serialises");
        assert_eq!(encoded["kind"], "hospital");
        assert_eq!(dto.kind(), EntityKind::Hospital);

        let decoded: AggregateDto = serde_json::from_value(encoded).expect("dto deserialises");
        assert_eq!(decoded, dto);
    }
}
