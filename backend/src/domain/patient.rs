//! Patient aggregate.

use chrono::NaiveDate;

use super::address::AddressId;
use super::contact::ContactId;
use super::credential::CredentialId;
use super::id::define_uuid_id;
use super::naming::{self, ProfileValidationError};

define_uuid_id! {
    /// Identifier of a patient aggregate, generated by the saga.
    PatientId
}

/// Validated patient profile fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfileSpec {
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
}

impl PatientProfileSpec {
    /// Validate and construct a [`PatientProfileSpec`].
    pub fn new(
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Self, ProfileValidationError> {
        let earliest =
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        if date_of_birth < earliest {
            return Err(ProfileValidationError::DateOutOfRange {
                field: "date of birth",
            });
        }

        Ok(Self {
            first_name: naming::person_name("first name", first_name)?,
            last_name: naming::person_name("last name", last_name)?,
            date_of_birth,
        })
    }

    /// Patient's first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Patient's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Patient's date of birth.
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }
}

/// Fully constructed patient aggregate as persisted in the domain store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientAggregate {
    pub id: PatientId,
    pub credential_id: CredentialId,
    pub address_id: AddressId,
    pub contact_id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl PatientAggregate {
    /// Assemble an aggregate from a validated spec and the ids produced by
    /// the earlier saga steps.
    pub fn from_spec(
        id: PatientId,
        credential_id: CredentialId,
        address_id: AddressId,
        contact_id: ContactId,
        spec: PatientProfileSpec,
    ) -> Self {
        let PatientProfileSpec {
            first_name,
            last_name,
            date_of_birth,
        } = spec;

        Self {
            id,
            credential_id,
            address_id,
            contact_id,
            first_name,
            last_name,
            date_of_birth,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ancient_birth_dates_are_rejected() {
        let dob = NaiveDate::from_ymd_opt(1899, 12, 31).expect("valid date literal");
        let err = PatientProfileSpec::new("Rebecca", "Adler", dob)
            .expect_err("pre-1900 dates must fail");
        assert_eq!(
            err,
            ProfileValidationError::DateOutOfRange {
                field: "date of birth"
            }
        );
    }

    #[rstest]
    fn valid_spec_round_trips_into_aggregate() {
        let dob = NaiveDate::from_ymd_opt(1985, 6, 14).expect("valid date literal");
        let spec =
            PatientProfileSpec::new("Rebecca", "Adler", dob).expect("valid profile spec");

        let aggregate = PatientAggregate::from_spec(
            PatientId::random(),
            CredentialId::random(),
            AddressId::random(),
            ContactId::random(),
            spec,
        );

        assert_eq!(aggregate.first_name, "Rebecca");
        assert_eq!(aggregate.date_of_birth, dob);
    }
}
