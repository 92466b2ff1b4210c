//! Contact details owned one-to-one by an aggregate.
//!
//! Like addresses, contacts are separately deletable rows referenced by id;
//! the saga captures the id before profile deletion and removes the row
//! explicitly.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::id::define_uuid_id;

define_uuid_id! {
    /// Identifier of a contact row.
    ContactId
}

/// Validation errors returned by [`ContactSpec::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// E-mail address was blank or not e-mail shaped.
    InvalidEmail,
    /// Phone number was blank or not a plausible dialling string.
    InvalidPhone,
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "contact e-mail must be a valid address"),
            Self::InvalidPhone => write!(
                f,
                "contact phone must be 7-20 characters of digits, spaces, or a leading +"
            ),
        }
    }
}

impl std::error::Error for ContactValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("contact e-mail regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = r"^\+?[0-9][0-9 ]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("contact phone regex failed to compile: {error}"))
    })
}

/// Minimum phone number length.
pub const PHONE_MIN: usize = 7;
/// Maximum phone number length.
pub const PHONE_MAX: usize = 20;

/// Validated contact fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ContactSpecDto", into = "ContactSpecDto")]
pub struct ContactSpec {
    email: String,
    phone: String,
}

impl ContactSpec {
    /// Validate and construct a [`ContactSpec`].
    pub fn new(email: &str, phone: &str) -> Result<Self, ContactValidationError> {
        let email = email.trim();
        if !email_regex().is_match(email) {
            return Err(ContactValidationError::InvalidEmail);
        }

        let phone = phone.trim();
        let length = phone.chars().count();
        if !(PHONE_MIN..=PHONE_MAX).contains(&length) || !phone_regex().is_match(phone) {
            return Err(ContactValidationError::InvalidPhone);
        }

        Ok(Self {
            email: email.to_lowercase(),
            phone: phone.to_owned(),
        })
    }

    /// Contact e-mail address, normalised to lowercase.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Contact phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactSpecDto {
    email: String,
    phone: String,
}

impl From<ContactSpec> for ContactSpecDto {
    fn from(value: ContactSpec) -> Self {
        Self {
            email: value.email,
            phone: value.phone,
        }
    }
}

impl TryFrom<ContactSpecDto> for ContactSpec {
    type Error = ContactValidationError;

    fn try_from(value: ContactSpecDto) -> Result<Self, Self::Error> {
        ContactSpec::new(&value.email, &value.phone)
    }
}

/// Persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub spec: ContactSpec,
}

impl Contact {
    /// Assemble a contact row from a fresh id and validated fields.
    pub fn new(id: ContactId, spec: ContactSpec) -> Self {
        Self { id, spec }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "020 7946 0000", ContactValidationError::InvalidEmail)]
    #[case("not-an-address", "020 7946 0000", ContactValidationError::InvalidEmail)]
    #[case("a@x.com", "", ContactValidationError::InvalidPhone)]
    #[case("a@x.com", "12345", ContactValidationError::InvalidPhone)]
    #[case("a@x.com", "call-me-maybe", ContactValidationError::InvalidPhone)]
    #[case("a@x.com", "+44 20 7946 0000 0000 00", ContactValidationError::InvalidPhone)]
    fn invalid_contacts(
        #[case] email: &str,
        #[case] phone: &str,
        #[case] expected: ContactValidationError,
    ) {
        let err = ContactSpec::new(email, phone).expect_err("invalid contact must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("Ward.Sister@Clinic.example", "+44 20 7946 0958", "ward.sister@clinic.example")]
    #[case("a@x.com", "0201234567", "a@x.com")]
    fn valid_contacts_normalise_email(
        #[case] email: &str,
        #[case] phone: &str,
        #[case] expected_email: &str,
    ) {
        let spec = ContactSpec::new(email, phone).expect("valid contact spec");
        assert_eq!(spec.email(), expected_email);
        assert_eq!(spec.phone(), phone);
    }

    #[rstest]
    fn spec_round_trips_through_serde() {
        let original = ContactSpec::new("a@x.com", "+44 20 7946 0958").expect("valid spec");
        let encoded = serde_json::to_value(&original).expect("spec serialises");
        let decoded: ContactSpec = serde_json::from_value(encoded).expect("spec deserialises");
        assert_eq!(decoded, original);
    }
}
