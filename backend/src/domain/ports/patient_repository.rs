//! Driven port for the patient aggregate gateway.

use async_trait::async_trait;

use crate::domain::{PatientAggregate, PatientId};

use super::PersistenceError;

/// Driven port for patient aggregates in the domain store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Insert the aggregate, returning the number of rows written.
    async fn create(&self, aggregate: &PatientAggregate) -> Result<usize, PersistenceError>;

    /// Fetch an aggregate by identifier.
    async fn find_by_id(
        &self,
        id: PatientId,
    ) -> Result<Option<PatientAggregate>, PersistenceError>;

    /// Replace the stored aggregate with the supplied one (whole-row
    /// semantics). `None` when the id is absent.
    async fn update(
        &self,
        aggregate: &PatientAggregate,
    ) -> Result<Option<usize>, PersistenceError>;

    /// Delete the aggregate, returning the removed row so callers can read
    /// its foreign ids; `None` when absent.
    async fn delete(&self, id: PatientId)
    -> Result<Option<PatientAggregate>, PersistenceError>;
}
