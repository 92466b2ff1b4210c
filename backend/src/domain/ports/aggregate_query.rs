//! Driving port for composed aggregate reads.
//!
//! Returns the same DTO shape as a successful provisioning run, so callers
//! observe either the complete aggregate or nothing.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{EntityKind, Error};

use super::AggregateDto;

/// Driving port for reading one composed aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AggregateQuery: Send + Sync {
    /// Fetch the composed aggregate for the id, or `None` when absent.
    async fn fetch(&self, kind: EntityKind, id: Uuid) -> Result<Option<AggregateDto>, Error>;
}
