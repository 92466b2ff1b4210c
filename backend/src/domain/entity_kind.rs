//! Closed set of provisionable entity kinds.
//!
//! The kind is selected once at the start of a saga run and drives the
//! per-kind step and compensation lists. No role strings circulate inside
//! the domain; the identity adapter serialises the kind at its boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity kinds the provisioning saga knows how to build and tear down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Doctor,
    Patient,
    Hospital,
}

impl EntityKind {
    /// Lowercase label used in confirmation messages and log fields.
    pub fn label(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
            Self::Hospital => "hospital",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntityKind::Doctor, "doctor")]
    #[case(EntityKind::Patient, "patient")]
    #[case(EntityKind::Hospital, "hospital")]
    fn labels_are_stable(#[case] kind: EntityKind, #[case] expected: &str) {
        assert_eq!(kind.label(), expected);
        assert_eq!(kind.to_string(), expected);
    }

    #[rstest]
    fn serialises_as_snake_case(
        #[values(EntityKind::Doctor, EntityKind::Patient, EntityKind::Hospital)] kind: EntityKind,
    ) {
        let encoded = serde_json::to_string(&kind).expect("kind serialises");
        assert_eq!(encoded, format!("\"{}\"", kind.label()));
    }
}
