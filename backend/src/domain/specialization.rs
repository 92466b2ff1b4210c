//! Specialization catalog entity.
//!
//! Specializations are shared reference data owned by the catalog, not by
//! any doctor. Doctors point at them through join rows; tearing down a
//! doctor removes the join rows only and must leave the catalog untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::define_uuid_id;

define_uuid_id! {
    /// Identifier of a catalog specialization.
    SpecializationId
}

/// Maximum length of a specialization name.
pub const SPECIALIZATION_NAME_MAX: usize = 64;

/// Validation errors returned by [`Specialization::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecializationValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for SpecializationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "specialization name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "specialization name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for SpecializationValidationError {}

/// Catalog entry linking a stable id to a human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialization {
    pub id: SpecializationId,
    pub name: String,
}

impl Specialization {
    /// Validate and construct a catalog entry.
    pub fn new(
        id: SpecializationId,
        name: impl Into<String>,
    ) -> Result<Self, SpecializationValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SpecializationValidationError::EmptyName);
        }
        if trimmed.chars().count() > SPECIALIZATION_NAME_MAX {
            return Err(SpecializationValidationError::NameTooLong {
                max: SPECIALIZATION_NAME_MAX,
            });
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", SpecializationValidationError::EmptyName)]
    #[case("  ", SpecializationValidationError::EmptyName)]
    fn blank_names_are_rejected(
        #[case] name: &str,
        #[case] expected: SpecializationValidationError,
    ) {
        let err = Specialization::new(SpecializationId::random(), name)
            .expect_err("blank names must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn overlong_names_are_rejected() {
        let err = Specialization::new(SpecializationId::random(), "X".repeat(65))
            .expect_err("overlong names must fail");
        assert_eq!(
            err,
            SpecializationValidationError::NameTooLong {
                max: SPECIALIZATION_NAME_MAX
            }
        );
    }

    #[rstest]
    fn names_are_trimmed() {
        let entry = Specialization::new(SpecializationId::random(), "  Cardiology  ")
            .expect("valid specialization");
        assert_eq!(entry.name, "Cardiology");
    }
}
