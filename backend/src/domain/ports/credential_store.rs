//! Driven port for the external identity store.
//!
//! The identity store is a genuinely separate system of record: it shares no
//! transaction manager with the domain store, and credential creation or
//! deletion committed through this port can only be undone by an explicit
//! inverse call. The saga coordinator treats every mutation here as a step
//! with a recorded compensation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    CredentialId, CredentialRecord, CredentialSpec, EntityKind, LoginId,
};

/// Errors raised by identity-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// The identity store could not be reached.
    #[error("identity store transport failed: {message}")]
    Transport { message: String },
    /// The login identifier is already registered.
    #[error("login identifier {login_id} is already registered")]
    LoginTaken { login_id: String },
    /// The identity store rejected the request.
    #[error("identity store rejected the request: {message}")]
    Rejected { message: String },
}

impl CredentialStoreError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a duplicate-login error for the given identifier.
    pub fn login_taken(login_id: impl Into<String>) -> Self {
        Self::LoginTaken {
            login_id: login_id.into(),
        }
    }

    /// Create a rejection error with the given message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Driven port for credential management in the identity store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a credential record by its login identifier.
    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Register a new credential and return its store-assigned identifier.
    async fn create_credential(
        &self,
        spec: &CredentialSpec,
    ) -> Result<CredentialId, CredentialStoreError>;

    /// Assign the entity role to an existing credential.
    async fn assign_role(
        &self,
        id: CredentialId,
        role: EntityKind,
    ) -> Result<(), CredentialStoreError>;

    /// Remove a credential. Removing an absent credential succeeds.
    async fn delete_credential(&self, id: CredentialId) -> Result<(), CredentialStoreError>;
}

#[derive(Debug, Clone)]
struct StoredCredential {
    login_id: LoginId,
    secret_fingerprint: String,
    role: Option<EntityKind>,
}

/// In-memory credential store used by tests and local wiring.
///
/// Secrets are kept only as SHA-256 fingerprints; the fixture never retains
/// secret material.
#[derive(Debug, Default)]
pub struct FixtureCredentialStore {
    records: Mutex<HashMap<CredentialId, StoredCredential>>,
}

impl FixtureCredentialStore {
    /// Create an empty fixture store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of credential records currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no credential records are held.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fingerprint stored for a login identifier, if present.
    pub fn fingerprint_of(&self, login_id: &LoginId) -> Option<String> {
        self.lock()
            .values()
            .find(|stored| &stored.login_id == login_id)
            .map(|stored| stored.secret_fingerprint.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CredentialId, StoredCredential>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CredentialStore for FixtureCredentialStore {
    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let records = self.lock();
        Ok(records.iter().find_map(|(id, stored)| {
            (&stored.login_id == login_id).then(|| CredentialRecord {
                id: *id,
                login_id: stored.login_id.clone(),
                role: stored.role,
            })
        }))
    }

    async fn create_credential(
        &self,
        spec: &CredentialSpec,
    ) -> Result<CredentialId, CredentialStoreError> {
        let mut records = self.lock();
        if records
            .values()
            .any(|stored| &stored.login_id == spec.login_id())
        {
            return Err(CredentialStoreError::login_taken(
                spec.login_id().as_ref(),
            ));
        }

        let id = CredentialId::random();
        records.insert(
            id,
            StoredCredential {
                login_id: spec.login_id().clone(),
                secret_fingerprint: spec.secret().fingerprint(),
                role: None,
            },
        );
        Ok(id)
    }

    async fn assign_role(
        &self,
        id: CredentialId,
        role: EntityKind,
    ) -> Result<(), CredentialStoreError> {
        let mut records = self.lock();
        match records.get_mut(&id) {
            Some(stored) => {
                stored.role = Some(role);
                Ok(())
            }
            None => Err(CredentialStoreError::rejected(format!(
                "credential {id} does not exist"
            ))),
        }
    }

    async fn delete_credential(&self, id: CredentialId) -> Result<(), CredentialStoreError> {
        self.lock().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn spec(login: &str) -> CredentialSpec {
        CredentialSpec::try_from_parts(login, "longenough").expect("valid credential spec")
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = FixtureCredentialStore::new();
        let id = store
            .create_credential(&spec("a@x.com"))
            .await
            .expect("creation succeeds");
        store
            .assign_role(id, EntityKind::Doctor)
            .await
            .expect("role assignment succeeds");

        let login = LoginId::new("a@x.com").expect("valid login id");
        let record = store
            .find_by_login_id(&login)
            .await
            .expect("lookup succeeds")
            .expect("record exists");

        assert_eq!(record.id, id);
        assert_eq!(record.role, Some(EntityKind::Doctor));
    }

    #[tokio::test]
    async fn duplicate_login_is_rejected() {
        let store = FixtureCredentialStore::new();
        store
            .create_credential(&spec("a@x.com"))
            .await
            .expect("first creation succeeds");

        let err = store
            .create_credential(&spec("a@x.com"))
            .await
            .expect_err("duplicate login must fail");
        assert_eq!(err, CredentialStoreError::login_taken("a@x.com"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = FixtureCredentialStore::new();
        let id = store
            .create_credential(&spec("a@x.com"))
            .await
            .expect("creation succeeds");

        store.delete_credential(id).await.expect("first delete");
        store.delete_credential(id).await.expect("second delete");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn only_fingerprints_are_retained() {
        let store = FixtureCredentialStore::new();
        let spec = spec("a@x.com");
        store
            .create_credential(&spec)
            .await
            .expect("creation succeeds");

        let fingerprint = store
            .fingerprint_of(spec.login_id())
            .expect("fingerprint stored");
        assert_eq!(fingerprint, spec.secret().fingerprint());
        assert_ne!(fingerprint, spec.secret().expose());
    }

    #[tokio::test]
    async fn assign_role_on_missing_credential_is_rejected() {
        let store = FixtureCredentialStore::new();
        let result = store
            .assign_role(CredentialId::random(), EntityKind::Doctor)
            .await;
        assert!(matches!(
            result,
            Err(CredentialStoreError::Rejected { .. })
        ));
    }
}
