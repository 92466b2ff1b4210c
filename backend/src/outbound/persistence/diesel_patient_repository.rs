//! PostgreSQL-backed `PatientRepository` gateway.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PatientRepository, PersistenceError};
use crate::domain::{AddressId, ContactId, CredentialId, PatientAggregate, PatientId};

use super::models::{NewPatientRow, PatientRow, PatientUpdate};
use super::pool::DbPool;
use super::schema::patients;
use super::unit_of_work::{UnitOfWork, map_diesel_error};

/// Diesel-backed implementation of the `PatientRepository` port.
#[derive(Clone)]
pub struct DieselPatientRepository {
    uow: UnitOfWork,
}

impl DieselPatientRepository {
    /// Create a new gateway over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn row_to_aggregate(row: PatientRow) -> PatientAggregate {
    PatientAggregate {
        id: PatientId::from_uuid(row.id),
        credential_id: CredentialId::from_uuid(row.credential_id),
        address_id: AddressId::from_uuid(row.address_id),
        contact_id: ContactId::from_uuid(row.contact_id),
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: row.date_of_birth,
    }
}

#[async_trait]
impl PatientRepository for DieselPatientRepository {
    async fn create(&self, aggregate: &PatientAggregate) -> Result<usize, PersistenceError> {
        let row = NewPatientRow {
            id: *aggregate.id.as_uuid(),
            credential_id: *aggregate.credential_id.as_uuid(),
            first_name: &aggregate.first_name,
            last_name: &aggregate.last_name,
            date_of_birth: aggregate.date_of_birth,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };

        let mut conn = self.uow.connection().await?;
        diesel::insert_into(patients::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: PatientId,
    ) -> Result<Option<PatientAggregate>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<PatientRow> = patients::table
            .filter(patients::id.eq(id.as_uuid()))
            .select(PatientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_aggregate))
    }

    async fn update(
        &self,
        aggregate: &PatientAggregate,
    ) -> Result<Option<usize>, PersistenceError> {
        let changeset = PatientUpdate {
            credential_id: *aggregate.credential_id.as_uuid(),
            first_name: &aggregate.first_name,
            last_name: &aggregate.last_name,
            date_of_birth: aggregate.date_of_birth,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };

        let mut conn = self.uow.connection().await?;
        let updated = diesel::update(patients::table.filter(patients::id.eq(aggregate.id.as_uuid())))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok((updated > 0).then_some(updated))
    }

    async fn delete(
        &self,
        id: PatientId,
    ) -> Result<Option<PatientAggregate>, PersistenceError> {
        let mut conn = self.uow.connection().await?;
        let row: Option<PatientRow> =
            diesel::delete(patients::table.filter(patients::id.eq(id.as_uuid())))
                .returning(PatientRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        Ok(row.map(row_to_aggregate))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn row_to_aggregate_copies_all_fields() {
        let row = PatientRow {
            id: Uuid::new_v4(),
            credential_id: Uuid::new_v4(),
            first_name: "Rebecca".to_owned(),
            last_name: "Adler".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 14).expect("valid date literal"),
            address_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let aggregate = row_to_aggregate(row.clone());
        assert_eq!(*aggregate.id.as_uuid(), row.id);
        assert_eq!(*aggregate.credential_id.as_uuid(), row.credential_id);
        assert_eq!(aggregate.date_of_birth, row.date_of_birth);
    }
}
