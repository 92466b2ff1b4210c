//! PostgreSQL-backed `HospitalRepository` gateway.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HospitalRepository, PersistenceError};
use crate::domain::{AddressId, ContactId, CredentialId, HospitalAggregate, HospitalId};

use super::models::{HospitalRow, HospitalUpdate, NewHospitalRow};
use super::pool::DbPool;
use super::schema::hospitals;
use super::unit_of_work::{UnitOfWork, map_diesel_error};

/// Diesel-backed implementation of the `HospitalRepository` port.
#[derive(Clone)]
pub struct DieselHospitalRepository {
    uow: UnitOfWork,
}

impl DieselHospitalRepository {
    /// Create a new gateway over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn row_to_aggregate(row: HospitalRow) -> HospitalAggregate {
    HospitalAggregate {
        id: HospitalId::from_uuid(row.id),
        credential_id: CredentialId::from_uuid(row.credential_id),
        address_id: AddressId::from_uuid(row.address_id),
        contact_id: ContactId::from_uuid(row.contact_id),
        name: row.name,
        registration_number: row.registration_number,
    }
}

#[async_trait]
impl HospitalRepository for DieselHospitalRepository {
    async fn create(&self, aggregate: &HospitalAggregate) -> Result<usize, PersistenceError> {
        let row = NewHospitalRow {
            id: *aggregate.id.as_uuid(),
            credential_id: *aggregate.credential_id.as_uuid(),
            name: &aggregate.name,
            registration_number: &aggregate.registration_number,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };

        let mut conn = self.uow.connection().await?;
        diesel::insert_into(hospitals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: HospitalId,
    ) -> Result<Option<HospitalAggregate>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<HospitalRow> = hospitals::table
            .filter(hospitals::id.eq(id.as_uuid()))
            .select(HospitalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_aggregate))
    }

    async fn update(
        &self,
        aggregate: &HospitalAggregate,
    ) -> Result<Option<usize>, PersistenceError> {
        let changeset = HospitalUpdate {
            credential_id: *aggregate.credential_id.as_uuid(),
            name: &aggregate.name,
            registration_number: &aggregate.registration_number,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };

        let mut conn = self.uow.connection().await?;
        let updated =
            diesel::update(hospitals::table.filter(hospitals::id.eq(aggregate.id.as_uuid())))
                .set(&changeset)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        Ok((updated > 0).then_some(updated))
    }

    async fn delete(
        &self,
        id: HospitalId,
    ) -> Result<Option<HospitalAggregate>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<HospitalRow> =
            diesel::delete(hospitals::table.filter(hospitals::id.eq(id.as_uuid())))
                .returning(HospitalRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        Ok(row.map(row_to_aggregate))
    }
}
