//! PostgreSQL-backed `SpecializationCatalog` adapter.
//!
//! Read-only by design: the catalog is reference data maintained outside
//! this service, and nothing in this adapter can remove an entry.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    PersistenceError, SpecializationCatalog, SpecializationCatalogError,
};
use crate::domain::{Specialization, SpecializationId};

use super::models::SpecializationRow;
use super::pool::DbPool;
use super::schema::specializations;
use super::unit_of_work::{UnitOfWork, map_diesel_error};

/// Diesel-backed implementation of the `SpecializationCatalog` port.
#[derive(Clone)]
pub struct DieselSpecializationCatalog {
    uow: UnitOfWork,
}

impl DieselSpecializationCatalog {
    /// Create a new catalog over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn row_to_specialization(
    id: SpecializationId,
    name: String,
) -> Result<Specialization, SpecializationCatalogError> {
    Specialization::new(id, name).map_err(|err| {
        SpecializationCatalogError::from(PersistenceError::query(format!(
            "stored specialization {id} is invalid: {err}"
        )))
    })
}

#[async_trait]
impl SpecializationCatalog for DieselSpecializationCatalog {
    async fn resolve(
        &self,
        ids: &[SpecializationId],
    ) -> Result<Vec<Specialization>, SpecializationCatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.uow.connection().await?;
        let rows: Vec<SpecializationRow> = specializations::table
            .filter(specializations::id.eq_any(&uuids))
            .select(SpecializationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| SpecializationCatalogError::from(map_diesel_error(err)))?;

        let by_id: HashMap<Uuid, String> =
            rows.into_iter().map(|row| (row.id, row.name)).collect();

        let unknown: Vec<SpecializationId> = ids
            .iter()
            .copied()
            .filter(|id| !by_id.contains_key(id.as_uuid()))
            .collect();
        if !unknown.is_empty() {
            return Err(SpecializationCatalogError::unknown(unknown));
        }

        // Preserve the caller's request order.
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(name) = by_id.get(id.as_uuid()) {
                resolved.push(row_to_specialization(*id, name.clone())?);
            }
        }
        Ok(resolved)
    }

    async fn find_all(&self) -> Result<Vec<Specialization>, SpecializationCatalogError> {
        let mut conn = self.uow.connection().await?;
        let rows: Vec<SpecializationRow> = specializations::table
            .order(specializations::name.asc())
            .select(SpecializationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| SpecializationCatalogError::from(map_diesel_error(err)))?;

        rows.into_iter()
            .map(|row| row_to_specialization(SpecializationId::from_uuid(row.id), row.name))
            .collect()
    }
}
