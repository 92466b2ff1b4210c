//! Driven port for the shared specialization catalog.
//!
//! The catalog is reference data: the port deliberately exposes no delete
//! operation, so no saga can remove a catalog entry as a side effect of
//! tearing down a doctor.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Specialization, SpecializationId};

use super::PersistenceError;

/// Errors raised by specialization catalog adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecializationCatalogError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] PersistenceError),
    /// One or more requested ids are not in the catalog.
    #[error("unknown specialization ids: {}", .ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Unknown { ids: Vec<SpecializationId> },
}

impl SpecializationCatalogError {
    /// Create an unknown-ids error.
    pub fn unknown(ids: Vec<SpecializationId>) -> Self {
        Self::Unknown { ids }
    }
}

/// Driven port for resolving catalog specializations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecializationCatalog: Send + Sync {
    /// Resolve every id to its catalog entry, preserving request order.
    ///
    /// Fails with [`SpecializationCatalogError::Unknown`] listing every id
    /// that is not in the catalog; no partial result is returned.
    async fn resolve(
        &self,
        ids: &[SpecializationId],
    ) -> Result<Vec<Specialization>, SpecializationCatalogError>;

    /// List the full catalog.
    async fn find_all(&self) -> Result<Vec<Specialization>, SpecializationCatalogError>;
}

/// In-memory catalog used by tests and local wiring.
#[derive(Debug, Default)]
pub struct FixtureSpecializationCatalog {
    entries: HashMap<SpecializationId, Specialization>,
}

impl FixtureSpecializationCatalog {
    /// Create a catalog preloaded with the given entries.
    pub fn with_entries(entries: impl IntoIterator<Item = Specialization>) -> Self {
        Self {
            entries: entries.into_iter().map(|entry| (entry.id, entry)).collect(),
        }
    }
}

#[async_trait]
impl SpecializationCatalog for FixtureSpecializationCatalog {
    async fn resolve(
        &self,
        ids: &[SpecializationId],
    ) -> Result<Vec<Specialization>, SpecializationCatalogError> {
        let unknown: Vec<SpecializationId> = ids
            .iter()
            .copied()
            .filter(|id| !self.entries.contains_key(id))
            .collect();
        if !unknown.is_empty() {
            return Err(SpecializationCatalogError::unknown(unknown));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Specialization>, SpecializationCatalogError> {
        let mut entries: Vec<Specialization> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn entry(name: &str) -> Specialization {
        Specialization::new(SpecializationId::random(), name).expect("valid specialization")
    }

    #[tokio::test]
    async fn resolve_preserves_request_order() {
        let cardiology = entry("Cardiology");
        let oncology = entry("Oncology");
        let catalog = FixtureSpecializationCatalog::with_entries([
            cardiology.clone(),
            oncology.clone(),
        ]);

        let resolved = catalog
            .resolve(&[oncology.id, cardiology.id])
            .await
            .expect("all ids resolve");
        assert_eq!(resolved, vec![oncology, cardiology]);
    }

    #[tokio::test]
    async fn resolve_names_every_unknown_id() {
        let known = entry("Cardiology");
        let missing_a = SpecializationId::random();
        let missing_b = SpecializationId::random();
        let catalog = FixtureSpecializationCatalog::with_entries([known.clone()]);

        let err = catalog
            .resolve(&[known.id, missing_a, missing_b])
            .await
            .expect_err("unknown ids must fail");

        match err {
            SpecializationCatalogError::Unknown { ids } => {
                assert_eq!(ids, vec![missing_a, missing_b]);
            }
            other => panic!("expected unknown-ids error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_all_sorts_by_name() {
        let catalog = FixtureSpecializationCatalog::with_entries([
            entry("Oncology"),
            entry("Cardiology"),
        ]);

        let names: Vec<String> = catalog
            .find_all()
            .await
            .expect("catalog lists")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["Cardiology", "Oncology"]);
    }
}
