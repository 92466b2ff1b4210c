//! PostgreSQL-backed `DoctorRepository` gateway.
//!
//! The aggregate spans three tables (profile, qualifications, specialization
//! links). Every mutation runs inside one unit-of-work transaction so the
//! aggregate appears and disappears atomically; deletes remove join rows
//! only and never touch the specialization catalog.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use crate::domain::ports::{DoctorRepository, PersistenceError};
use crate::domain::{
    AddressId, ContactId, CredentialId, DoctorAggregate, DoctorId, Qualification,
    QualificationId, QualificationSpec, SpecializationId,
};

use super::models::{
    DoctorRow, DoctorSpecializationRow, DoctorUpdate, NewDoctorRow, NewQualificationRow,
    QualificationRow,
};
use super::pool::DbPool;
use super::schema::{doctor_qualifications, doctor_specializations, doctors};
use super::unit_of_work::UnitOfWork;

/// Diesel-backed implementation of the `DoctorRepository` port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    uow: UnitOfWork,
}

impl DieselDoctorRepository {
    /// Create a new gateway over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            uow: UnitOfWork::new(pool),
        }
    }
}

fn qualification_rows<'a>(
    aggregate: &'a DoctorAggregate,
) -> Vec<NewQualificationRow<'a>> {
    aggregate
        .qualifications
        .iter()
        .map(|qualification| NewQualificationRow {
            id: *qualification.id.as_uuid(),
            doctor_id: *aggregate.id.as_uuid(),
            title: qualification.spec.title(),
            institution: qualification.spec.institution(),
            year_awarded: qualification.spec.year_awarded(),
        })
        .collect()
}

fn link_rows(aggregate: &DoctorAggregate) -> Vec<DoctorSpecializationRow> {
    aggregate
        .specialization_ids
        .iter()
        .map(|specialization_id| DoctorSpecializationRow {
            doctor_id: *aggregate.id.as_uuid(),
            specialization_id: *specialization_id.as_uuid(),
        })
        .collect()
}

fn rows_to_aggregate(
    row: DoctorRow,
    qualification_rows: Vec<QualificationRow>,
    link_rows: Vec<DoctorSpecializationRow>,
) -> Result<DoctorAggregate, PersistenceError> {
    let doctor_id = row.id;
    let qualifications = qualification_rows
        .into_iter()
        .map(|qualification| {
            let spec = QualificationSpec::new(
                &qualification.title,
                &qualification.institution,
                qualification.year_awarded,
            )
            .map_err(|err| {
                PersistenceError::query(format!(
                    "stored qualification {} is invalid: {err}",
                    qualification.id
                ))
            })?;
            Ok(Qualification::new(
                QualificationId::from_uuid(qualification.id),
                spec,
            ))
        })
        .collect::<Result<Vec<_>, PersistenceError>>()?;

    Ok(DoctorAggregate {
        id: DoctorId::from_uuid(doctor_id),
        credential_id: CredentialId::from_uuid(row.credential_id),
        address_id: AddressId::from_uuid(row.address_id),
        contact_id: ContactId::from_uuid(row.contact_id),
        first_name: row.first_name,
        last_name: row.last_name,
        licence_number: row.licence_number,
        qualifications,
        specialization_ids: link_rows
            .into_iter()
            .map(|link| SpecializationId::from_uuid(link.specialization_id))
            .collect(),
    })
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn create(&self, aggregate: &DoctorAggregate) -> Result<usize, PersistenceError> {
        let profile_row = NewDoctorRow {
            id: *aggregate.id.as_uuid(),
            credential_id: *aggregate.credential_id.as_uuid(),
            first_name: &aggregate.first_name,
            last_name: &aggregate.last_name,
            licence_number: &aggregate.licence_number,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };
        let qualification_rows = qualification_rows(aggregate);
        let link_rows = link_rows(aggregate);

        self.uow
            .transaction(|conn| {
                async move {
                    let mut written = diesel::insert_into(doctors::table)
                        .values(&profile_row)
                        .execute(conn)
                        .await?;

                    if !qualification_rows.is_empty() {
                        written += diesel::insert_into(doctor_qualifications::table)
                            .values(&qualification_rows)
                            .execute(conn)
                            .await?;
                    }

                    if !link_rows.is_empty() {
                        written += diesel::insert_into(doctor_specializations::table)
                            .values(&link_rows)
                            .execute(conn)
                            .await?;
                    }

                    Ok(written)
                }
                .scope_boxed()
            })
            .await
    }

    async fn find_by_id(
        &self,
        id: DoctorId,
    ) -> Result<Option<DoctorAggregate>, PersistenceError> {
        let doctor_uuid = *id.as_uuid();

        // One transaction so the three SELECTs observe a consistent
        // snapshot of the aggregate.
        let loaded = self
            .uow
            .transaction(|conn| {
                async move {
                    let Some(row) = doctors::table
                        .filter(doctors::id.eq(doctor_uuid))
                        .select(DoctorRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let qualifications: Vec<QualificationRow> = doctor_qualifications::table
                        .filter(doctor_qualifications::doctor_id.eq(doctor_uuid))
                        .order(doctor_qualifications::year_awarded.asc())
                        .select(QualificationRow::as_select())
                        .load(conn)
                        .await?;

                    let links: Vec<DoctorSpecializationRow> = doctor_specializations::table
                        .filter(doctor_specializations::doctor_id.eq(doctor_uuid))
                        .select(DoctorSpecializationRow::as_select())
                        .load(conn)
                        .await?;

                    Ok(Some((row, qualifications, links)))
                }
                .scope_boxed()
            })
            .await?;

        loaded
            .map(|(row, qualifications, links)| rows_to_aggregate(row, qualifications, links))
            .transpose()
    }

    async fn update(
        &self,
        aggregate: &DoctorAggregate,
    ) -> Result<Option<usize>, PersistenceError> {
        let doctor_uuid = *aggregate.id.as_uuid();
        let changeset = DoctorUpdate {
            credential_id: *aggregate.credential_id.as_uuid(),
            first_name: &aggregate.first_name,
            last_name: &aggregate.last_name,
            licence_number: &aggregate.licence_number,
            address_id: *aggregate.address_id.as_uuid(),
            contact_id: *aggregate.contact_id.as_uuid(),
        };
        let qualification_rows = qualification_rows(aggregate);
        let link_rows = link_rows(aggregate);

        self.uow
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(doctors::table.filter(doctors::id.eq(doctor_uuid)))
                        .set(&changeset)
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(None);
                    }

                    // Whole-row semantics: child collections are replaced.
                    let mut written = updated;
                    diesel::delete(
                        doctor_qualifications::table
                            .filter(doctor_qualifications::doctor_id.eq(doctor_uuid)),
                    )
                    .execute(conn)
                    .await?;
                    if !qualification_rows.is_empty() {
                        written += diesel::insert_into(doctor_qualifications::table)
                            .values(&qualification_rows)
                            .execute(conn)
                            .await?;
                    }

                    diesel::delete(
                        doctor_specializations::table
                            .filter(doctor_specializations::doctor_id.eq(doctor_uuid)),
                    )
                    .execute(conn)
                    .await?;
                    if !link_rows.is_empty() {
                        written += diesel::insert_into(doctor_specializations::table)
                            .values(&link_rows)
                            .execute(conn)
                            .await?;
                    }

                    Ok(Some(written))
                }
                .scope_boxed()
            })
            .await
    }

    async fn delete(&self, id: DoctorId) -> Result<Option<DoctorAggregate>, PersistenceError> {
        let doctor_uuid = *id.as_uuid();

        let removed = self
            .uow
            .transaction(|conn| {
                async move {
                    let Some(row) = doctors::table
                        .filter(doctors::id.eq(doctor_uuid))
                        .select(DoctorRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let qualifications: Vec<QualificationRow> = doctor_qualifications::table
                        .filter(doctor_qualifications::doctor_id.eq(doctor_uuid))
                        .select(QualificationRow::as_select())
                        .load(conn)
                        .await?;
                    let links: Vec<DoctorSpecializationRow> = doctor_specializations::table
                        .filter(doctor_specializations::doctor_id.eq(doctor_uuid))
                        .select(DoctorSpecializationRow::as_select())
                        .load(conn)
                        .await?;

                    // Join rows only; the referenced catalog entries stay.
                    diesel::delete(
                        doctor_specializations::table
                            .filter(doctor_specializations::doctor_id.eq(doctor_uuid)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(
                        doctor_qualifications::table
                            .filter(doctor_qualifications::doctor_id.eq(doctor_uuid)),
                    )
                    .execute(conn)
                    .await?;
                    let removed_rows =
                        diesel::delete(doctors::table.filter(doctors::id.eq(doctor_uuid)))
                            .execute(conn)
                            .await?;
                    if removed_rows == 0 {
                        return Ok(None);
                    }

                    Ok(Some((row, qualifications, links)))
                }
                .scope_boxed()
            })
            .await?;

        removed
            .map(|(row, qualifications, links)| rows_to_aggregate(row, qualifications, links))
            .transpose()
    }

    async fn replace_specialization_links(
        &self,
        id: DoctorId,
        specialization_ids: &[SpecializationId],
    ) -> Result<Option<usize>, PersistenceError> {
        let doctor_uuid = *id.as_uuid();
        let link_rows: Vec<DoctorSpecializationRow> = specialization_ids
            .iter()
            .map(|specialization_id| DoctorSpecializationRow {
                doctor_id: doctor_uuid,
                specialization_id: *specialization_id.as_uuid(),
            })
            .collect();

        self.uow
            .transaction(|conn| {
                async move {
                    let exists: bool = diesel::select(diesel::dsl::exists(
                        doctors::table.filter(doctors::id.eq(doctor_uuid)),
                    ))
                    .get_result(conn)
                    .await?;
                    if !exists {
                        return Ok(None);
                    }

                    diesel::delete(
                        doctor_specializations::table
                            .filter(doctor_specializations::doctor_id.eq(doctor_uuid)),
                    )
                    .execute(conn)
                    .await?;

                    let written = if link_rows.is_empty() {
                        0
                    } else {
                        diesel::insert_into(doctor_specializations::table)
                            .values(&link_rows)
                            .execute(conn)
                            .await?
                    };

                    Ok(Some(written))
                }
                .scope_boxed()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn profile_row(id: Uuid) -> DoctorRow {
        DoctorRow {
            id,
            credential_id: Uuid::new_v4(),
            first_name: "Gregory".to_owned(),
            last_name: "House".to_owned(),
            licence_number: "GMC-1234567".to_owned(),
            address_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_to_aggregate_reassembles_children() {
        let doctor_id = Uuid::new_v4();
        let specialization_id = Uuid::new_v4();
        let qualification = QualificationRow {
            id: Uuid::new_v4(),
            doctor_id,
            title: "MD".to_owned(),
            institution: "Johns Hopkins".to_owned(),
            year_awarded: 1989,
        };
        let link = DoctorSpecializationRow {
            doctor_id,
            specialization_id,
        };

        let aggregate = rows_to_aggregate(profile_row(doctor_id), vec![qualification], vec![link])
            .expect("valid rows convert");

        assert_eq!(*aggregate.id.as_uuid(), doctor_id);
        assert_eq!(aggregate.qualifications.len(), 1);
        assert_eq!(
            aggregate.specialization_ids,
            vec![SpecializationId::from_uuid(specialization_id)]
        );
    }

    #[rstest]
    fn rows_to_aggregate_rejects_corrupt_qualifications() {
        let doctor_id = Uuid::new_v4();
        let qualification = QualificationRow {
            id: Uuid::new_v4(),
            doctor_id,
            title: String::new(),
            institution: "Johns Hopkins".to_owned(),
            year_awarded: 1989,
        };

        let err = rows_to_aggregate(profile_row(doctor_id), vec![qualification], vec![])
            .expect_err("corrupt rows must fail");
        assert!(matches!(err, PersistenceError::Query { .. }));
    }
}
