//! Driven port for contact persistence.

use async_trait::async_trait;

use crate::domain::{Contact, ContactId};

use super::PersistenceError;

/// Driven port for contact rows in the domain store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a new contact row.
    async fn create(&self, contact: &Contact) -> Result<(), PersistenceError>;

    /// Fetch a contact by identifier.
    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, PersistenceError>;

    /// Delete a contact, returning the removed row; `None` when absent.
    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, PersistenceError>;
}
