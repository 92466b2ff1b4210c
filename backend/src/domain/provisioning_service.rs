//! Provisioning and deprovisioning saga coordinator.
//!
//! The identity store and the domain store share no transaction manager, so
//! this service approximates atomicity with an ordered step list and a
//! matching ordered compensation list per entity kind. Steps run
//! sequentially on the calling task; later steps depend on ids produced by
//! earlier ones, and there is no mid-saga cancellation. The same
//! compensating-action strategy is applied uniformly to all three kinds;
//! there is no separate ambient-transaction path.
//!
//! Compensation is invisible on success: when every inverse operation lands,
//! the caller sees the original triggering error and the unwind is audible
//! only in logs. A failed inverse is a different matter entirely, because a
//! residual record now needs operator attention; that surfaces as a
//! distinct `CompensationFailed` error carrying both the trigger and the
//! residuals.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AddressDto, AddressRepository, AggregateDto, AggregateQuery, ContactDto, ContactRepository,
    CredentialStore, CredentialStoreError, DeprovisionOutcome, DoctorDto, DoctorRepository,
    HospitalDto, HospitalRepository, PatientDto, PatientRepository, PersistenceError,
    ProfileSpec, ProvisionRequest, ProvisioningCommand, QualificationDto, SpecializationCatalog,
    SpecializationCatalogError, SpecializationDto,
};
use crate::domain::{
    Address, AddressId, AddressSpec, CompensationAction, CompensationLog, Contact, ContactId,
    ContactSpec, CredentialId, CredentialSpec, DoctorAggregate, DoctorId, DoctorProfileSpec,
    EntityKind, Error, ErrorCode, HospitalAggregate, HospitalId, HospitalProfileSpec,
    PatientAggregate, PatientId, PatientProfileSpec, SagaResult, Specialization,
};

/// Saga coordinator implementing the provisioning driving ports.
pub struct ProvisioningService {
    credentials: Arc<dyn CredentialStore>,
    addresses: Arc<dyn AddressRepository>,
    contacts: Arc<dyn ContactRepository>,
    specializations: Arc<dyn SpecializationCatalog>,
    doctors: Arc<dyn DoctorRepository>,
    patients: Arc<dyn PatientRepository>,
    hospitals: Arc<dyn HospitalRepository>,
}

impl ProvisioningService {
    /// Create a coordinator over the given store ports.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        addresses: Arc<dyn AddressRepository>,
        contacts: Arc<dyn ContactRepository>,
        specializations: Arc<dyn SpecializationCatalog>,
        doctors: Arc<dyn DoctorRepository>,
        patients: Arc<dyn PatientRepository>,
        hospitals: Arc<dyn HospitalRepository>,
    ) -> Self {
        Self {
            credentials,
            addresses,
            contacts,
            specializations,
            doctors,
            patients,
            hospitals,
        }
    }

    fn map_credential_error(error: CredentialStoreError) -> Error {
        match error {
            CredentialStoreError::Transport { message } => {
                Error::service_unavailable(format!("identity store unavailable: {message}"))
            }
            CredentialStoreError::LoginTaken { login_id } => Error::conflict(format!(
                "login identifier {login_id} is already in use"
            )),
            CredentialStoreError::Rejected { message } => {
                Error::internal(format!("identity store error: {message}"))
            }
        }
    }

    fn map_persistence_error(error: PersistenceError) -> Error {
        match error {
            PersistenceError::Connection { message } => {
                Error::service_unavailable(format!("domain store unavailable: {message}"))
            }
            PersistenceError::Query { message } => {
                Error::internal(format!("domain store error: {message}"))
            }
        }
    }

    fn map_catalog_error(error: SpecializationCatalogError) -> Error {
        match error {
            SpecializationCatalogError::Unknown { ids } => {
                let listed: Vec<String> = ids.iter().map(ToString::to_string).collect();
                Error::invalid_request(format!(
                    "unknown specialization ids: {}",
                    listed.join(", ")
                ))
                .with_details(json!({ "unknownSpecializationIds": listed }))
            }
            SpecializationCatalogError::Store(store) => Self::map_persistence_error(store),
        }
    }

    /// Reclassify infrastructure failures that happen after the first
    /// committed step. Validation and conflict outcomes pass through so the
    /// caller still sees the triggering category.
    fn step_failed(step: &'static str, error: Error) -> Error {
        match error.code() {
            ErrorCode::ServiceUnavailable | ErrorCode::InternalError => {
                Error::provisioning_failed(format!("{step} failed: {}", error.message()))
                    .with_details(json!({ "step": step, "cause": error }))
            }
            _ => error,
        }
    }

    /// Steps 1 and 2: reject a taken login identifier, then create the
    /// credential and assign its role. The credential delete is recorded
    /// before role assignment so a failed assignment unwinds it.
    async fn register_credential(
        &self,
        spec: &CredentialSpec,
        kind: EntityKind,
        log: &mut CompensationLog,
    ) -> SagaResult<CredentialId> {
        let existing = self
            .credentials
            .find_by_login_id(spec.login_id())
            .await
            .map_err(Self::map_credential_error)?;
        if existing.is_some() {
            return Err(Error::conflict(format!(
                "login identifier {} is already in use",
                spec.login_id()
            )));
        }

        let credential_id = self
            .credentials
            .create_credential(spec)
            .await
            .map_err(Self::map_credential_error)?;
        log.record(CompensationAction::DeleteCredential(credential_id));

        self.credentials
            .assign_role(credential_id, kind)
            .await
            .map_err(|err| {
                Self::step_failed("role assignment", Self::map_credential_error(err))
            })?;

        Ok(credential_id)
    }

    /// Step 4a: commit the address row and record its inverse.
    async fn create_address(
        &self,
        spec: AddressSpec,
        log: &mut CompensationLog,
    ) -> SagaResult<Address> {
        let address = Address::new(AddressId::random(), spec);
        self.addresses
            .create(&address)
            .await
            .map_err(|err| {
                Self::step_failed("address creation", Self::map_persistence_error(err))
            })?;
        log.record(CompensationAction::DeleteAddress(address.id));
        Ok(address)
    }

    /// Step 4b: commit the contact row and record its inverse.
    async fn create_contact(
        &self,
        spec: ContactSpec,
        log: &mut CompensationLog,
    ) -> SagaResult<Contact> {
        let contact = Contact::new(ContactId::random(), spec);
        self.contacts
            .create(&contact)
            .await
            .map_err(|err| {
                Self::step_failed("contact creation", Self::map_persistence_error(err))
            })?;
        log.record(CompensationAction::DeleteContact(contact.id));
        Ok(contact)
    }

    /// Run the recorded compensations in reverse-commit order.
    ///
    /// Best effort: every action is attempted even if an earlier one fails.
    /// Returns the original trigger when the unwind is clean, or a
    /// `CompensationFailed` error naming the residual records otherwise.
    async fn unwind(&self, log: CompensationLog, trigger: Error) -> Error {
        if log.is_empty() {
            return trigger;
        }

        let mut residuals = Vec::new();
        for action in log.into_unwind_order() {
            let outcome = match action {
                CompensationAction::DeleteCredential(id) => self
                    .credentials
                    .delete_credential(id)
                    .await
                    .map_err(|err| err.to_string()),
                CompensationAction::DeleteAddress(id) => self
                    .addresses
                    .delete(id)
                    .await
                    .map(|_| ())
                    .map_err(|err| err.to_string()),
                CompensationAction::DeleteContact(id) => self
                    .contacts
                    .delete(id)
                    .await
                    .map(|_| ())
                    .map_err(|err| err.to_string()),
            };

            match outcome {
                Ok(()) => warn!(
                    record = action.residual_label(),
                    id = %action.target_id(),
                    "compensated provisioning step"
                ),
                Err(message) => {
                    error!(
                        record = action.residual_label(),
                        id = %action.target_id(),
                        error = %message,
                        "compensation failed; residual record requires operator attention"
                    );
                    residuals.push(json!({
                        "record": action.residual_label(),
                        "id": action.target_id(),
                        "error": message,
                    }));
                }
            }
        }

        if residuals.is_empty() {
            trigger
        } else {
            Error::compensation_failed(format!(
                "compensation left residual records after: {}",
                trigger.message()
            ))
            .with_details(json!({ "trigger": trigger, "residuals": residuals }))
        }
    }

    async fn provision_doctor(
        &self,
        credentials: CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: DoctorProfileSpec,
    ) -> SagaResult<AggregateDto> {
        let mut log = CompensationLog::new();
        match self
            .try_provision_doctor(&credentials, address, contact, profile, &mut log)
            .await
        {
            Ok(dto) => Ok(dto),
            Err(trigger) => Err(self.unwind(log, trigger).await),
        }
    }

    async fn try_provision_doctor(
        &self,
        credentials: &CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: DoctorProfileSpec,
        log: &mut CompensationLog,
    ) -> SagaResult<AggregateDto> {
        let credential_id = self
            .register_credential(credentials, EntityKind::Doctor, log)
            .await?;

        // Step 3: resolve catalog references before any owned-child write.
        let specializations = self
            .specializations
            .resolve(profile.specialization_ids())
            .await
            .map_err(|err| {
                Self::step_failed("specialization validation", Self::map_catalog_error(err))
            })?;

        let address = self.create_address(address, log).await?;
        let contact = self.create_contact(contact, log).await?;

        // Step 5: the aggregate and all owned children commit together.
        let aggregate = DoctorAggregate::from_spec(
            DoctorId::random(),
            credential_id,
            address.id,
            contact.id,
            profile,
        );
        self.doctors.create(&aggregate).await.map_err(|err| {
            Self::step_failed("doctor aggregate creation", Self::map_persistence_error(err))
        })?;

        Ok(AggregateDto::Doctor(compose_doctor_dto(
            aggregate,
            address,
            contact,
            specializations,
        )))
    }

    async fn provision_patient(
        &self,
        credentials: CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: PatientProfileSpec,
    ) -> SagaResult<AggregateDto> {
        let mut log = CompensationLog::new();
        match self
            .try_provision_patient(&credentials, address, contact, profile, &mut log)
            .await
        {
            Ok(dto) => Ok(dto),
            Err(trigger) => Err(self.unwind(log, trigger).await),
        }
    }

    async fn try_provision_patient(
        &self,
        credentials: &CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: PatientProfileSpec,
        log: &mut CompensationLog,
    ) -> SagaResult<AggregateDto> {
        let credential_id = self
            .register_credential(credentials, EntityKind::Patient, log)
            .await?;

        let address = self.create_address(address, log).await?;
        let contact = self.create_contact(contact, log).await?;

        let aggregate = PatientAggregate::from_spec(
            PatientId::random(),
            credential_id,
            address.id,
            contact.id,
            profile,
        );
        self.patients.create(&aggregate).await.map_err(|err| {
            Self::step_failed(
                "patient aggregate creation",
                Self::map_persistence_error(err),
            )
        })?;

        Ok(AggregateDto::Patient(compose_patient_dto(
            aggregate, address, contact,
        )))
    }

    async fn provision_hospital(
        &self,
        credentials: CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: HospitalProfileSpec,
    ) -> SagaResult<AggregateDto> {
        let mut log = CompensationLog::new();
        match self
            .try_provision_hospital(&credentials, address, contact, profile, &mut log)
            .await
        {
            Ok(dto) => Ok(dto),
            Err(trigger) => Err(self.unwind(log, trigger).await),
        }
    }

    async fn try_provision_hospital(
        &self,
        credentials: &CredentialSpec,
        address: AddressSpec,
        contact: ContactSpec,
        profile: HospitalProfileSpec,
        log: &mut CompensationLog,
    ) -> SagaResult<AggregateDto> {
        let credential_id = self
            .register_credential(credentials, EntityKind::Hospital, log)
            .await?;

        let address = self.create_address(address, log).await?;
        let contact = self.create_contact(contact, log).await?;

        let aggregate = HospitalAggregate::from_spec(
            HospitalId::random(),
            credential_id,
            address.id,
            contact.id,
            profile,
        );
        self.hospitals.create(&aggregate).await.map_err(|err| {
            Self::step_failed(
                "hospital aggregate creation",
                Self::map_persistence_error(err),
            )
        })?;

        Ok(AggregateDto::Hospital(compose_hospital_dto(
            aggregate, address, contact,
        )))
    }

    /// The deprovisioning tail: remove the captured owned rows and the
    /// credential, enumerating removed vs remaining parts on failure.
    async fn teardown_owned(
        &self,
        kind: EntityKind,
        id: Uuid,
        address_id: AddressId,
        contact_id: ContactId,
        credential_id: CredentialId,
    ) -> SagaResult<()> {
        if let Err(err) = self.addresses.delete(address_id).await {
            return Err(Self::partial_deprovisioning(
                kind,
                id,
                &["aggregate"],
                &["address", "contact", "credential"],
                Self::map_persistence_error(err),
            ));
        }

        if let Err(err) = self.contacts.delete(contact_id).await {
            return Err(Self::partial_deprovisioning(
                kind,
                id,
                &["aggregate", "address"],
                &["contact", "credential"],
                Self::map_persistence_error(err),
            ));
        }

        if let Err(err) = self.credentials.delete_credential(credential_id).await {
            return Err(Self::partial_deprovisioning(
                kind,
                id,
                &["aggregate", "address", "contact"],
                &["credential"],
                Self::map_credential_error(err),
            ));
        }

        Ok(())
    }

    fn partial_deprovisioning(
        kind: EntityKind,
        id: Uuid,
        removed: &[&str],
        remaining: &[&str],
        cause: Error,
    ) -> Error {
        error!(
            kind = kind.label(),
            %id,
            removed = %removed.join(", "),
            remaining = %remaining.join(", "),
            "deprovisioning stopped partway"
        );
        Error::partial_deprovisioning(format!(
            "deprovisioning of {kind} {id} stopped after removing: {}",
            removed.join(", ")
        ))
        .with_details(json!({
            "kind": kind,
            "id": id,
            "removed": removed,
            "remaining": remaining,
            "cause": cause,
        }))
    }

    fn removed_outcome(kind: EntityKind, id: Uuid) -> DeprovisionOutcome {
        DeprovisionOutcome::Removed {
            kind,
            id,
            message: format!("{kind} {id} deprovisioned"),
        }
    }

    async fn deprovision_doctor(&self, id: DoctorId) -> SagaResult<DeprovisionOutcome> {
        // Capture owned ids before deleting the aggregate row; deletion
        // detaches navigation to them.
        let Some(aggregate) = self
            .doctors
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(DeprovisionOutcome::NotFound);
        };
        let (address_id, contact_id, credential_id) = (
            aggregate.address_id,
            aggregate.contact_id,
            aggregate.credential_id,
        );

        // Removes the profile row, qualifications, and specialization link
        // rows; the catalog entries behind the links stay untouched.
        if self
            .doctors
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?
            .is_none()
        {
            return Ok(DeprovisionOutcome::NotFound);
        }

        self.teardown_owned(
            EntityKind::Doctor,
            *id.as_uuid(),
            address_id,
            contact_id,
            credential_id,
        )
        .await?;
        Ok(Self::removed_outcome(EntityKind::Doctor, *id.as_uuid()))
    }

    async fn deprovision_patient(&self, id: PatientId) -> SagaResult<DeprovisionOutcome> {
        let Some(aggregate) = self
            .patients
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(DeprovisionOutcome::NotFound);
        };
        let (address_id, contact_id, credential_id) = (
            aggregate.address_id,
            aggregate.contact_id,
            aggregate.credential_id,
        );

        if self
            .patients
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?
            .is_none()
        {
            return Ok(DeprovisionOutcome::NotFound);
        }

        self.teardown_owned(
            EntityKind::Patient,
            *id.as_uuid(),
            address_id,
            contact_id,
            credential_id,
        )
        .await?;
        Ok(Self::removed_outcome(EntityKind::Patient, *id.as_uuid()))
    }

    async fn deprovision_hospital(&self, id: HospitalId) -> SagaResult<DeprovisionOutcome> {
        let Some(aggregate) = self
            .hospitals
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(DeprovisionOutcome::NotFound);
        };
        let (address_id, contact_id, credential_id) = (
            aggregate.address_id,
            aggregate.contact_id,
            aggregate.credential_id,
        );

        if self
            .hospitals
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?
            .is_none()
        {
            return Ok(DeprovisionOutcome::NotFound);
        }

        self.teardown_owned(
            EntityKind::Hospital,
            *id.as_uuid(),
            address_id,
            contact_id,
            credential_id,
        )
        .await?;
        Ok(Self::removed_outcome(EntityKind::Hospital, *id.as_uuid()))
    }

    async fn load_address(&self, id: AddressId) -> SagaResult<Address> {
        self.addresses
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                Error::internal(format!("aggregate references missing address {id}"))
            })
    }

    async fn load_contact(&self, id: ContactId) -> SagaResult<Contact> {
        self.contacts
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                Error::internal(format!("aggregate references missing contact {id}"))
            })
    }

    async fn compose_doctor(&self, aggregate: DoctorAggregate) -> SagaResult<AggregateDto> {
        let address = self.load_address(aggregate.address_id).await?;
        let contact = self.load_contact(aggregate.contact_id).await?;
        let specializations = self
            .specializations
            .resolve(&aggregate.specialization_ids)
            .await
            .map_err(Self::map_catalog_error)?;
        Ok(AggregateDto::Doctor(compose_doctor_dto(
            aggregate,
            address,
            contact,
            specializations,
        )))
    }

    async fn compose_patient(&self, aggregate: PatientAggregate) -> SagaResult<AggregateDto> {
        let address = self.load_address(aggregate.address_id).await?;
        let contact = self.load_contact(aggregate.contact_id).await?;
        Ok(AggregateDto::Patient(compose_patient_dto(
            aggregate, address, contact,
        )))
    }

    async fn compose_hospital(
        &self,
        aggregate: HospitalAggregate,
    ) -> SagaResult<AggregateDto> {
        let address = self.load_address(aggregate.address_id).await?;
        let contact = self.load_contact(aggregate.contact_id).await?;
        Ok(AggregateDto::Hospital(compose_hospital_dto(
            aggregate, address, contact,
        )))
    }
}

fn compose_doctor_dto(
    aggregate: DoctorAggregate,
    address: Address,
    contact: Contact,
    specializations: Vec<Specialization>,
) -> DoctorDto {
    DoctorDto {
        id: *aggregate.id.as_uuid(),
        credential_id: *aggregate.credential_id.as_uuid(),
        first_name: aggregate.first_name,
        last_name: aggregate.last_name,
        licence_number: aggregate.licence_number,
        address: AddressDto::from(address),
        contact: ContactDto::from(contact),
        qualifications: aggregate
            .qualifications
            .into_iter()
            .map(QualificationDto::from)
            .collect(),
        specializations: specializations
            .into_iter()
            .map(SpecializationDto::from)
            .collect(),
    }
}

fn compose_patient_dto(
    aggregate: PatientAggregate,
    address: Address,
    contact: Contact,
) -> PatientDto {
    PatientDto {
        id: *aggregate.id.as_uuid(),
        credential_id: *aggregate.credential_id.as_uuid(),
        first_name: aggregate.first_name,
        last_name: aggregate.last_name,
        date_of_birth: aggregate.date_of_birth,
        address: AddressDto::from(address),
        contact: ContactDto::from(contact),
    }
}

fn compose_hospital_dto(
    aggregate: HospitalAggregate,
    address: Address,
    contact: Contact,
) -> HospitalDto {
    HospitalDto {
        id: *aggregate.id.as_uuid(),
        credential_id: *aggregate.credential_id.as_uuid(),
        name: aggregate.name,
        registration_number: aggregate.registration_number,
        address: AddressDto::from(address),
        contact: ContactDto::from(contact),
    }
}

#[async_trait]
impl ProvisioningCommand for ProvisioningService {
    async fn provision(&self, request: ProvisionRequest) -> Result<AggregateDto, Error> {
        let ProvisionRequest {
            credentials,
            address,
            contact,
            profile,
        } = request;

        // The entity kind is selected exactly once, here.
        match profile {
            ProfileSpec::Doctor(profile) => {
                self.provision_doctor(credentials, address, contact, profile)
                    .await
            }
            ProfileSpec::Patient(profile) => {
                self.provision_patient(credentials, address, contact, profile)
                    .await
            }
            ProfileSpec::Hospital(profile) => {
                self.provision_hospital(credentials, address, contact, profile)
                    .await
            }
        }
    }

    async fn deprovision(
        &self,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<DeprovisionOutcome, Error> {
        match kind {
            EntityKind::Doctor => self.deprovision_doctor(DoctorId::from_uuid(id)).await,
            EntityKind::Patient => self.deprovision_patient(PatientId::from_uuid(id)).await,
            EntityKind::Hospital => self.deprovision_hospital(HospitalId::from_uuid(id)).await,
        }
    }
}

#[async_trait]
impl AggregateQuery for ProvisioningService {
    async fn fetch(&self, kind: EntityKind, id: Uuid) -> Result<Option<AggregateDto>, Error> {
        match kind {
            EntityKind::Doctor => {
                let Some(aggregate) = self
                    .doctors
                    .find_by_id(DoctorId::from_uuid(id))
                    .await
                    .map_err(Self::map_persistence_error)?
                else {
                    return Ok(None);
                };
                self.compose_doctor(aggregate).await.map(Some)
            }
            EntityKind::Patient => {
                let Some(aggregate) = self
                    .patients
                    .find_by_id(PatientId::from_uuid(id))
                    .await
                    .map_err(Self::map_persistence_error)?
                else {
                    return Ok(None);
                };
                self.compose_patient(aggregate).await.map(Some)
            }
            EntityKind::Hospital => {
                let Some(aggregate) = self
                    .hospitals
                    .find_by_id(HospitalId::from_uuid(id))
                    .await
                    .map_err(Self::map_persistence_error)?
                else {
                    return Ok(None);
                };
                self.compose_hospital(aggregate).await.map(Some)
            }
        }
    }
}

#[cfg(test)]
#[path = "provisioning_service_tests.rs"]
mod tests;
