//! Hospital aggregate.

use super::address::AddressId;
use super::contact::ContactId;
use super::credential::CredentialId;
use super::id::define_uuid_id;
use super::naming::{self, ProfileValidationError};

define_uuid_id! {
    /// Identifier of a hospital aggregate, generated by the saga.
    HospitalId
}

/// Validated hospital profile fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalProfileSpec {
    name: String,
    registration_number: String,
}

impl HospitalProfileSpec {
    /// Validate and construct a [`HospitalProfileSpec`].
    pub fn new(name: &str, registration_number: &str) -> Result<Self, ProfileValidationError> {
        Ok(Self {
            name: naming::organisation_name("hospital name", name)?,
            registration_number: naming::registration_code(
                "registration number",
                registration_number,
            )?,
        })
    }

    /// Hospital name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Care-provider registration number, uppercased.
    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }
}

/// Fully constructed hospital aggregate as persisted in the domain store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalAggregate {
    pub id: HospitalId,
    pub credential_id: CredentialId,
    pub address_id: AddressId,
    pub contact_id: ContactId,
    pub name: String,
    pub registration_number: String,
}

impl HospitalAggregate {
    /// Assemble an aggregate from a validated spec and the ids produced by
    /// the earlier saga steps.
    pub fn from_spec(
        id: HospitalId,
        credential_id: CredentialId,
        address_id: AddressId,
        contact_id: ContactId,
        spec: HospitalProfileSpec,
    ) -> Self {
        let HospitalProfileSpec {
            name,
            registration_number,
        } = spec;

        Self {
            id,
            credential_id,
            address_id,
            contact_id,
            name,
            registration_number,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn registration_number_is_uppercased() {
        let spec = HospitalProfileSpec::new("St. Mary's Hospital", "cqc-10342")
            .expect("valid profile spec");
        assert_eq!(spec.registration_number(), "CQC-10342");
    }

    #[rstest]
    #[case("", "CQC-1")]
    #[case("St. Mary's", "")]
    fn blank_fields_are_rejected(#[case] name: &str, #[case] registration: &str) {
        HospitalProfileSpec::new(name, registration).expect_err("blank fields must fail");
    }
}
