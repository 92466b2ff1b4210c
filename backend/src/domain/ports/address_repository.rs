//! Driven port for address persistence.
//!
//! Each operation is independently transactional: a created address is
//! visible as soon as `create` returns, which is why the saga records a
//! delete-address compensation immediately afterwards.

use async_trait::async_trait;

use crate::domain::{Address, AddressId};

use super::PersistenceError;

/// Driven port for address rows in the domain store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Insert a new address row.
    async fn create(&self, address: &Address) -> Result<(), PersistenceError>;

    /// Fetch an address by identifier.
    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, PersistenceError>;

    /// Delete an address, returning the removed row; `None` when absent.
    async fn delete(&self, id: AddressId) -> Result<Option<Address>, PersistenceError>;
}
