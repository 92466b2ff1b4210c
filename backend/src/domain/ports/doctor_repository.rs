//! Driven port for the doctor aggregate gateway.
//!
//! `create` and `delete` cover the whole aggregate (profile row,
//! qualifications, specialization links) inside one domain-store
//! transaction, so readers observe either the complete aggregate or nothing.
//! An absent id is a normal outcome for `update`, `delete`, and
//! `replace_specialization_links`, reported as `None` rather than an error.

use async_trait::async_trait;

use crate::domain::{DoctorAggregate, DoctorId, SpecializationId};

use super::PersistenceError;

/// Driven port for doctor aggregates in the domain store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Insert the aggregate and all owned children atomically, returning
    /// the number of rows written.
    async fn create(&self, aggregate: &DoctorAggregate) -> Result<usize, PersistenceError>;

    /// Fetch an aggregate with its child collections eagerly loaded.
    async fn find_by_id(
        &self,
        id: DoctorId,
    ) -> Result<Option<DoctorAggregate>, PersistenceError>;

    /// Replace the stored aggregate with the supplied one (whole-row
    /// semantics: child collections are replaced, not merged). `None` when
    /// the id is absent.
    async fn update(
        &self,
        aggregate: &DoctorAggregate,
    ) -> Result<Option<usize>, PersistenceError>;

    /// Delete the aggregate and its owned children, returning the removed
    /// aggregate so callers can read its foreign ids; `None` when absent.
    /// Specialization link rows are removed; catalog entries are not.
    async fn delete(&self, id: DoctorId) -> Result<Option<DoctorAggregate>, PersistenceError>;

    /// Replace the specialization link rows only. `None` when the id is
    /// absent.
    async fn replace_specialization_links(
        &self,
        id: DoctorId,
        specialization_ids: &[SpecializationId],
    ) -> Result<Option<usize>, PersistenceError>;
}
