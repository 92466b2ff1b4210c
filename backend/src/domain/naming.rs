//! Shared validation for profile names and registration codes.
//!
//! Doctor, patient, and hospital profiles share the same field shapes, so
//! the character-set rules live here rather than in each aggregate module.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of a person name component.
pub const PERSON_NAME_MAX: usize = 64;
/// Maximum length of an organisation name.
pub const ORGANISATION_NAME_MAX: usize = 120;
/// Maximum length of a licence or registration code.
pub const CODE_MAX: usize = 32;

/// Validation errors shared by the profile spec constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    /// A required field was missing or blank once trimmed.
    Empty { field: &'static str },
    /// A field exceeded its maximum length.
    TooLong { field: &'static str, max: usize },
    /// A field contained characters outside its allowed set.
    InvalidCharacters { field: &'static str },
    /// A reference list contained the same id more than once.
    DuplicateReference { field: &'static str },
    /// A date field fell outside the supported range.
    DateOutOfRange { field: &'static str },
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::InvalidCharacters { field } => {
                write!(f, "{field} contains characters outside its allowed set")
            }
            Self::DuplicateReference { field } => {
                write!(f, "{field} must not repeat the same id")
            }
            Self::DateOutOfRange { field } => write!(f, "{field} is outside the supported range"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

static PERSON_NAME_RE: OnceLock<Regex> = OnceLock::new();
static ORGANISATION_NAME_RE: OnceLock<Regex> = OnceLock::new();
static CODE_RE: OnceLock<Regex> = OnceLock::new();

fn person_name_regex() -> &'static Regex {
    PERSON_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = r"^[A-Za-z][A-Za-z' \-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("person name regex failed to compile: {error}"))
    })
}

fn organisation_name_regex() -> &'static Regex {
    ORGANISATION_NAME_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9][A-Za-z0-9'&,. \-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("organisation name regex failed to compile: {error}"))
    })
}

fn code_regex() -> &'static Regex {
    CODE_RE.get_or_init(|| {
        let pattern = r"^[A-Z0-9][A-Z0-9\-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("registration code regex failed to compile: {error}"))
    })
}

fn checked(
    field: &'static str,
    value: &str,
    max: usize,
    pattern: &Regex,
) -> Result<String, ProfileValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ProfileValidationError::TooLong { field, max });
    }
    if !pattern.is_match(trimmed) {
        return Err(ProfileValidationError::InvalidCharacters { field });
    }
    Ok(trimmed.to_owned())
}

/// Validate a person name component (letters, apostrophes, hyphens, spaces).
pub(crate) fn person_name(
    field: &'static str,
    value: &str,
) -> Result<String, ProfileValidationError> {
    checked(field, value, PERSON_NAME_MAX, person_name_regex())
}

/// Validate an organisation name.
pub(crate) fn organisation_name(
    field: &'static str,
    value: &str,
) -> Result<String, ProfileValidationError> {
    checked(field, value, ORGANISATION_NAME_MAX, organisation_name_regex())
}

/// Validate a licence or registration code, normalising to uppercase.
pub(crate) fn registration_code(
    field: &'static str,
    value: &str,
) -> Result<String, ProfileValidationError> {
    let upper = value.trim().to_uppercase();
    checked(field, &upper, CODE_MAX, code_regex())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Gregory")]
    #[case("O'Brien")]
    #[case("Smith-Jones")]
    #[case("van der Berg")]
    fn person_names_accept_common_shapes(#[case] value: &str) {
        assert_eq!(person_name("first name", value).expect("valid name"), value);
    }

    #[rstest]
    #[case("", ProfileValidationError::Empty { field: "first name" })]
    #[case("4lice", ProfileValidationError::InvalidCharacters { field: "first name" })]
    #[case("Ali;ce", ProfileValidationError::InvalidCharacters { field: "first name" })]
    fn person_names_reject_bad_shapes(
        #[case] value: &str,
        #[case] expected: ProfileValidationError,
    ) {
        let err = person_name("first name", value).expect_err("invalid name must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("St. Mary's & District Hospital")]
    #[case("Clinic 42")]
    fn organisation_names_accept_punctuation(#[case] value: &str) {
        assert_eq!(
            organisation_name("name", value).expect("valid name"),
            value
        );
    }

    #[rstest]
    #[case("gmc-1234567", "GMC-1234567")]
    #[case("  cqc-999  ", "CQC-999")]
    fn registration_codes_normalise_to_uppercase(
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            registration_code("licence number", value).expect("valid code"),
            expected
        );
    }

    #[rstest]
    fn registration_codes_reject_spaces() {
        let err = registration_code("licence number", "GMC 1234")
            .expect_err("spaces are not allowed");
        assert_eq!(
            err,
            ProfileValidationError::InvalidCharacters {
                field: "licence number"
            }
        );
    }
}
