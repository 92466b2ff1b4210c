//! Doctor qualifications.
//!
//! Qualifications are an owned collection: they have no identity outside the
//! doctor aggregate and are written and removed with it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::define_uuid_id;

define_uuid_id! {
    /// Identifier of a qualification row.
    QualificationId
}

/// Earliest plausible award year.
pub const QUALIFICATION_YEAR_MIN: i32 = 1900;
/// Latest plausible award year.
pub const QUALIFICATION_YEAR_MAX: i32 = 2100;
/// Maximum length of the title and institution fields.
pub const QUALIFICATION_FIELD_MAX: usize = 120;

/// Validation errors returned by [`QualificationSpec::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualificationValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize },
    YearOutOfRange { min: i32, max: i32 },
}

impl fmt::Display for QualificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "qualification {field} must not be empty"),
            Self::TooLong { field, max } => {
                write!(f, "qualification {field} must be at most {max} characters")
            }
            Self::YearOutOfRange { min, max } => {
                write!(f, "qualification year must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for QualificationValidationError {}

fn required(
    field: &'static str,
    value: &str,
) -> Result<String, QualificationValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QualificationValidationError::Empty { field });
    }
    if trimmed.chars().count() > QUALIFICATION_FIELD_MAX {
        return Err(QualificationValidationError::TooLong {
            field,
            max: QUALIFICATION_FIELD_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Validated qualification fields of a doctor provisioning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "QualificationSpecDto", into = "QualificationSpecDto")]
pub struct QualificationSpec {
    title: String,
    institution: String,
    year_awarded: i32,
}

impl QualificationSpec {
    /// Validate and construct a [`QualificationSpec`].
    pub fn new(
        title: &str,
        institution: &str,
        year_awarded: i32,
    ) -> Result<Self, QualificationValidationError> {
        if !(QUALIFICATION_YEAR_MIN..=QUALIFICATION_YEAR_MAX).contains(&year_awarded) {
            return Err(QualificationValidationError::YearOutOfRange {
                min: QUALIFICATION_YEAR_MIN,
                max: QUALIFICATION_YEAR_MAX,
            });
        }
        Ok(Self {
            title: required("title", title)?,
            institution: required("institution", institution)?,
            year_awarded,
        })
    }

    /// Qualification title, e.g. a degree name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Awarding institution.
    pub fn institution(&self) -> &str {
        &self.institution
    }

    /// Year the qualification was awarded.
    pub fn year_awarded(&self) -> i32 {
        self.year_awarded
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QualificationSpecDto {
    title: String,
    institution: String,
    year_awarded: i32,
}

impl From<QualificationSpec> for QualificationSpecDto {
    fn from(value: QualificationSpec) -> Self {
        Self {
            title: value.title,
            institution: value.institution,
            year_awarded: value.year_awarded,
        }
    }
}

impl TryFrom<QualificationSpecDto> for QualificationSpec {
    type Error = QualificationValidationError;

    fn try_from(value: QualificationSpecDto) -> Result<Self, Self::Error> {
        QualificationSpec::new(&value.title, &value.institution, value.year_awarded)
    }
}

/// Persisted qualification row, owned by a doctor aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualification {
    pub id: QualificationId,
    pub spec: QualificationSpec,
}

impl Qualification {
    /// Assemble a qualification row from a fresh id and validated fields.
    pub fn new(id: QualificationId, spec: QualificationSpec) -> Self {
        Self { id, spec }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1899)]
    #[case(2101)]
    fn out_of_range_years_are_rejected(#[case] year: i32) {
        let err = QualificationSpec::new("MBBS", "St Elsewhere", year)
            .expect_err("out-of-range years must fail");
        assert_eq!(
            err,
            QualificationValidationError::YearOutOfRange {
                min: QUALIFICATION_YEAR_MIN,
                max: QUALIFICATION_YEAR_MAX
            }
        );
    }

    #[rstest]
    #[case("", "St Elsewhere", "title")]
    #[case("MBBS", "", "institution")]
    fn blank_fields_are_rejected(
        #[case] title: &str,
        #[case] institution: &str,
        #[case] field: &'static str,
    ) {
        let err = QualificationSpec::new(title, institution, 1999)
            .expect_err("blank fields must fail");
        assert_eq!(err, QualificationValidationError::Empty { field });
    }

    #[rstest]
    fn boundary_years_are_accepted() {
        for year in [QUALIFICATION_YEAR_MIN, QUALIFICATION_YEAR_MAX] {
            let spec = QualificationSpec::new("MBBS", "St Elsewhere", year)
                .expect("boundary years are valid");
            assert_eq!(spec.year_awarded(), year);
        }
    }
}
