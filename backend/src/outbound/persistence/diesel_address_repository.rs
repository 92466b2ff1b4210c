//! PostgreSQL-backed `AddressRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AddressRepository, PersistenceError};
use crate::domain::{Address, AddressId, AddressSpec};

use super::models::{AddressRow, NewAddressRow};
use super::pool::DbPool;
use super::schema::addresses;
use super::unit_of_work::{UnitOfWork, map_diesel_error};

/// Diesel-backed implementation of the `AddressRepository` port.
#[derive(Clone)]
pub struct DieselAddressRepository {
    uow: UnitOfWork,
}

impl DieselAddressRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn row_to_address(row: AddressRow) -> Result<Address, PersistenceError> {
    let spec = AddressSpec::new(
        &row.line1,
        row.line2.as_deref(),
        &row.city,
        &row.postcode,
        &row.country,
    )
    .map_err(|err| {
        PersistenceError::query(format!("stored address {} is invalid: {err}", row.id))
    })?;
    Ok(Address::new(AddressId::from_uuid(row.id), spec))
}

#[async_trait]
impl AddressRepository for DieselAddressRepository {
    async fn create(&self, address: &Address) -> Result<(), PersistenceError> {
        let row = NewAddressRow {
            id: *address.id.as_uuid(),
            line1: address.spec.line1(),
            line2: address.spec.line2(),
            city: address.spec.city(),
            postcode: address.spec.postcode(),
            country: address.spec.country(),
        };

        let mut conn = self.uow.connection().await?;
        diesel::insert_into(addresses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<AddressRow> = addresses::table
            .filter(addresses::id.eq(id.as_uuid()))
            .select(AddressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_address).transpose()
    }

    async fn delete(&self, id: AddressId) -> Result<Option<Address>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<AddressRow> =
            diesel::delete(addresses::table.filter(addresses::id.eq(id.as_uuid())))
                .returning(AddressRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        row.map(row_to_address).transpose()
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
    fn row_to_address_round_trips_valid_rows() {
        let row = AddressRow {
            id: Uuid::new_v4(),
            line1: "12 Harley Street".to_owned(),
            line2: None,
            city: "London".to_owned(),
            postcode: "W1G 9QD".to_owned(),
            country: "United Kingdom".to_owned(),
            created_at: Utc::now(),
        };

        let address = row_to_address(row.clone()).expect("valid row converts");
        assert_eq!(*address.id.as_uuid(), row.id);
        assert_eq!(address.spec.city(), "London");
    }

    #[rstest]
    fn row_to_address_rejects_corrupt_rows() {
        let row = AddressRow {
            id: Uuid::new_v4(),
            line1: String::new(),
            line2: None,
            city: "London".to_owned(),
            postcode: "W1G 9QD".to_owned(),
            country: "United Kingdom".to_owned(),
            created_at: Utc::now(),
        };

        let err = row_to_address(row).expect_err("corrupt row must fail");
        assert!(matches!(err, PersistenceError::Query { .. }));
    }
}
