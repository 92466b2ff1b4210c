//! PostgreSQL-backed `ContactRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContactRepository, PersistenceError};
use crate::domain::{Contact, ContactId, ContactSpec};

use super::models::{ContactRow, NewContactRow};
use super::pool::DbPool;
use super::schema::contacts;
use super::unit_of_work::{UnitOfWork, map_diesel_error};

/// Diesel-backed implementation of the `ContactRepository` port.
#[derive(Clone)]
pub struct DieselContactRepository {
    uow: UnitOfWork,
}

impl DieselContactRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn row_to_contact(row: ContactRow) -> Result<Contact, PersistenceError> {
    let spec = ContactSpec::new(&row.email, &row.phone).map_err(|err| {
        PersistenceError::query(format!("stored contact {} is invalid: {err}", row.id))
    })?;
    Ok(Contact::new(ContactId::from_uuid(row.id), spec))
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn create(&self, contact: &Contact) -> Result<(), PersistenceError> {
        let row = NewContactRow {
            id: *contact.id.as_uuid(),
            email: contact.spec.email(),
            phone: contact.spec.phone(),
        };

        let mut conn = self.uow.connection().await?;
        diesel::insert_into(contacts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<ContactRow> = contacts::table
            .filter(contacts::id.eq(id.as_uuid()))
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<ContactRow> =
            diesel::delete(contacts::table.filter(contacts::id.eq(id.as_uuid())))
                .returning(ContactRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn row_to_contact_rejects_corrupt_rows() {
        let row = ContactRow {
            id: Uuid::new_v4(),
            email: "not-an-address".to_owned(),
            phone: "0201234567".to_owned(),
            created_at: Utc::now(),
        };

        let err = row_to_contact(row).expect_err("corrupt row must fail");
        assert!(matches!(err, PersistenceError::Query { .. }));
    }
}
