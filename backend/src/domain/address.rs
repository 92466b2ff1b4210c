//! Postal address owned one-to-one by an aggregate.
//!
//! Addresses are separately deletable rows referenced by id from the owning
//! profile; deleting the profile row does not cascade to them, so the saga
//! deletes them explicitly during teardown.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::define_uuid_id;

define_uuid_id! {
    /// Identifier of an address row.
    AddressId
}

/// Maximum length of a single address line.
pub const ADDRESS_LINE_MAX: usize = 120;
/// Maximum length of a postcode.
pub const POSTCODE_MAX: usize = 16;

/// Validation errors returned by [`AddressSpec::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    /// A required field was missing or blank once trimmed.
    Empty { field: &'static str },
    /// A field exceeded its maximum length.
    TooLong { field: &'static str, max: usize },
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "address {field} must not be empty"),
            Self::TooLong { field, max } => {
                write!(f, "address {field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for AddressValidationError {}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, AddressValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(AddressValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Validated address fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "AddressSpecDto", into = "AddressSpecDto")]
pub struct AddressSpec {
    line1: String,
    line2: Option<String>,
    city: String,
    postcode: String,
    country: String,
}

impl AddressSpec {
    /// Validate and construct an [`AddressSpec`].
    pub fn new(
        line1: &str,
        line2: Option<&str>,
        city: &str,
        postcode: &str,
        country: &str,
    ) -> Result<Self, AddressValidationError> {
        let line2 = match line2.map(str::trim) {
            None | Some("") => None,
            Some(value) if value.chars().count() > ADDRESS_LINE_MAX => {
                return Err(AddressValidationError::TooLong {
                    field: "line2",
                    max: ADDRESS_LINE_MAX,
                });
            }
            Some(value) => Some(value.to_owned()),
        };

        Ok(Self {
            line1: required("line1", line1, ADDRESS_LINE_MAX)?,
            line2,
            city: required("city", city, ADDRESS_LINE_MAX)?,
            postcode: required("postcode", postcode, POSTCODE_MAX)?,
            country: required("country", country, ADDRESS_LINE_MAX)?,
        })
    }

    /// First address line.
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Optional second address line.
    pub fn line2(&self) -> Option<&str> {
        self.line2.as_deref()
    }

    /// City or town.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Postcode or ZIP code.
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    /// Country name.
    pub fn country(&self) -> &str {
        &self.country
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressSpecDto {
    line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line2: Option<String>,
    city: String,
    postcode: String,
    country: String,
}

impl From<AddressSpec> for AddressSpecDto {
    fn from(value: AddressSpec) -> Self {
        Self {
            line1: value.line1,
            line2: value.line2,
            city: value.city,
            postcode: value.postcode,
            country: value.country,
        }
    }
}

impl TryFrom<AddressSpecDto> for AddressSpec {
    type Error = AddressValidationError;

    fn try_from(value: AddressSpecDto) -> Result<Self, Self::Error> {
        AddressSpec::new(
            &value.line1,
            value.line2.as_deref(),
            &value.city,
            &value.postcode,
            &value.country,
        )
    }
}

/// Persisted address row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub spec: AddressSpec,
}

impl Address {
    /// Assemble an address row from a fresh id and validated fields.
    pub fn new(id: AddressId, spec: AddressSpec) -> Self {
        Self { id, spec }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn spec() -> AddressSpec {
        AddressSpec::new("12 Harley Street", None, "London", "W1G 9QD", "United Kingdom")
            .expect("valid address spec")
    }

    #[rstest]
    #[case("", "line1")]
    #[case("   ", "line1")]
    fn blank_line1_is_rejected(#[case] line1: &str, #[case] field: &str) {
        let err = AddressSpec::new(line1, None, "London", "W1", "UK")
            .expect_err("blank line1 must fail");
        assert_eq!(err, AddressValidationError::Empty { field: "line1" });
        assert!(err.to_string().contains(field));
    }

    #[rstest]
    fn overlong_postcode_is_rejected() {
        let err = AddressSpec::new("1 Main St", None, "Leeds", &"X".repeat(17), "UK")
            .expect_err("overlong postcode must fail");
        assert_eq!(
            err,
            AddressValidationError::TooLong {
                field: "postcode",
                max: POSTCODE_MAX
            }
        );
    }

    #[rstest]
    #[case(Some(""), None)]
    #[case(Some("  "), None)]
    #[case(Some("Suite 4"), Some("Suite 4"))]
    fn line2_blank_collapses_to_none(
        #[case] line2: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let spec = AddressSpec::new("1 Main St", line2, "Leeds", "LS1", "UK")
            .expect("valid address spec");
        assert_eq!(spec.line2(), expected);
    }

    #[rstest]
    fn fields_are_trimmed() {
        let spec = AddressSpec::new("  1 Main St ", None, " Leeds ", " LS1 ", " UK ")
            .expect("valid address spec");
        assert_eq!(spec.line1(), "1 Main St");
        assert_eq!(spec.city(), "Leeds");
        assert_eq!(spec.postcode(), "LS1");
        assert_eq!(spec.country(), "UK");
    }

    #[rstest]
    fn spec_round_trips_through_serde() {
        let original = spec();
        let encoded = serde_json::to_value(&original).expect("spec serialises");
        let decoded: AddressSpec = serde_json::from_value(encoded).expect("spec deserialises");
        assert_eq!(decoded, original);
    }
}
