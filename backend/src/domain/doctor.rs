//! Doctor aggregate.
//!
//! A doctor profile owns one address and one contact by id, a collection of
//! qualifications, and a set of specialization links into the shared
//! catalog. The credential id is a weak reference into the identity store;
//! the domain store cannot validate it.

use std::collections::HashSet;

use super::address::AddressId;
use super::contact::ContactId;
use super::credential::CredentialId;
use super::id::define_uuid_id;
use super::naming::{self, ProfileValidationError};
use super::qualification::{Qualification, QualificationId, QualificationSpec};
use super::specialization::SpecializationId;

define_uuid_id! {
    /// Identifier of a doctor aggregate, generated by the saga.
    DoctorId
}

/// Validated doctor profile fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfileSpec {
    first_name: String,
    last_name: String,
    licence_number: String,
    qualifications: Vec<QualificationSpec>,
    specialization_ids: Vec<SpecializationId>,
}

impl DoctorProfileSpec {
    /// Validate and construct a [`DoctorProfileSpec`].
    pub fn new(
        first_name: &str,
        last_name: &str,
        licence_number: &str,
        qualifications: Vec<QualificationSpec>,
        specialization_ids: Vec<SpecializationId>,
    ) -> Result<Self, ProfileValidationError> {
        let mut seen = HashSet::new();
        if !specialization_ids.iter().all(|id| seen.insert(*id)) {
            return Err(ProfileValidationError::DuplicateReference {
                field: "specialization ids",
            });
        }

        Ok(Self {
            first_name: naming::person_name("first name", first_name)?,
            last_name: naming::person_name("last name", last_name)?,
            licence_number: naming::registration_code("licence number", licence_number)?,
            qualifications,
            specialization_ids,
        })
    }

    /// Doctor's first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Doctor's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Medical licence number, uppercased.
    pub fn licence_number(&self) -> &str {
        &self.licence_number
    }

    /// Qualifications to create with the aggregate.
    pub fn qualifications(&self) -> &[QualificationSpec] {
        &self.qualifications
    }

    /// Catalog specializations to link to the aggregate.
    pub fn specialization_ids(&self) -> &[SpecializationId] {
        &self.specialization_ids
    }
}

/// Fully constructed doctor aggregate as persisted in the domain store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorAggregate {
    pub id: DoctorId,
    pub credential_id: CredentialId,
    pub address_id: AddressId,
    pub contact_id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub licence_number: String,
    pub qualifications: Vec<Qualification>,
    pub specialization_ids: Vec<SpecializationId>,
}

impl DoctorAggregate {
    /// Assemble an aggregate from a validated spec and the ids produced by
    /// the earlier saga steps, minting ids for the owned qualifications.
    pub fn from_spec(
        id: DoctorId,
        credential_id: CredentialId,
        address_id: AddressId,
        contact_id: ContactId,
        spec: DoctorProfileSpec,
    ) -> Self {
        let DoctorProfileSpec {
            first_name,
            last_name,
            licence_number,
            qualifications,
            specialization_ids,
        } = spec;

        let qualifications = qualifications
            .into_iter()
            .map(|spec| Qualification::new(QualificationId::random(), spec))
            .collect();

        Self {
            id,
            credential_id,
            address_id,
            contact_id,
            first_name,
            last_name,
            licence_number,
            qualifications,
            specialization_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn spec_with_ids(ids: Vec<SpecializationId>) -> Result<DoctorProfileSpec, ProfileValidationError> {
        DoctorProfileSpec::new(
            "Gregory",
            "House",
            "gmc-1234567",
            vec![QualificationSpec::new("MD", "Johns Hopkins", 1989).expect("valid spec")],
            ids,
        )
    }

    #[rstest]
    fn duplicate_specialization_ids_are_rejected() {
        let id = SpecializationId::random();
        let err = spec_with_ids(vec![id, id]).expect_err("duplicates must fail");
        assert_eq!(
            err,
            ProfileValidationError::DuplicateReference {
                field: "specialization ids"
            }
        );
    }

    #[rstest]
    fn from_spec_mints_distinct_qualification_ids() {
        let spec = DoctorProfileSpec::new(
            "Gregory",
            "House",
            "GMC-1234567",
            vec![
                QualificationSpec::new("MD", "Johns Hopkins", 1989).expect("valid spec"),
                QualificationSpec::new("Nephrology Board", "Michigan", 1994).expect("valid spec"),
            ],
            vec![SpecializationId::random()],
        )
        .expect("valid profile spec");

        let aggregate = DoctorAggregate::from_spec(
            DoctorId::random(),
            CredentialId::random(),
            AddressId::random(),
            ContactId::random(),
            spec,
        );

        assert_eq!(aggregate.qualifications.len(), 2);
        assert_ne!(
            aggregate.qualifications[0].id,
            aggregate.qualifications[1].id
        );
        assert_eq!(aggregate.licence_number, "GMC-1234567");
    }
}
