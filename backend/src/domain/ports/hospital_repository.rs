//! Driven port for the hospital aggregate gateway.

use async_trait::async_trait;

use crate::domain::{HospitalAggregate, HospitalId};

use super::PersistenceError;

/// Driven port for hospital aggregates in the domain store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalRepository: Send + Sync {
    /// Insert the aggregate, returning the number of rows written.
    async fn create(&self, aggregate: &HospitalAggregate) -> Result<usize, PersistenceError>;

    /// Fetch an aggregate by identifier.
    async fn find_by_id(
        &self,
        id: HospitalId,
    ) -> Result<Option<HospitalAggregate>, PersistenceError>;

    /// Replace the stored aggregate with the supplied one (whole-row
    /// semantics). `None` when the id is absent.
    async fn update(
        &self,
        aggregate: &HospitalAggregate,
    ) -> Result<Option<usize>, PersistenceError>;

    /// Delete the aggregate, returning the removed row so callers can read
    /// its foreign ids; `None` when absent.
    async fn delete(
        &self,
        id: HospitalId,
    ) -> Result<Option<HospitalAggregate>, PersistenceError>;
}
