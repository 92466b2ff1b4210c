//! Reqwest-backed identity store adapter.
//!
//! This adapter owns transport details only: endpoint construction, JSON
//! encoding, timeout handling, and HTTP status mapping. The identity
//! service does not participate in domain-store transactions: every
//! mutation made through this adapter commits independently, which is why
//! the saga pairs each one with a compensation.
//!
//! Entity kinds cross this boundary as role strings; nothing inside the
//! domain ever sees them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{CredentialId, CredentialRecord, CredentialSpec, EntityKind, LoginId};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// HTTP client adapter for the credential endpoints of the identity service.
pub struct HttpCredentialStore {
    client: Client,
    base_url: Url,
}

impl HttpCredentialStore {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CredentialStoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CredentialStoreError::rejected("identity store base URL cannot be a base")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCredentialBody<'a> {
    login_id: &'a str,
    secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedCredentialDto {
    credential_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRecordDto {
    credential_id: Uuid,
    login_id: String,
    role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRoleBody<'a> {
    role: &'a str,
}

fn parse_role(value: &str) -> Option<EntityKind> {
    match value {
        "doctor" => Some(EntityKind::Doctor),
        "patient" => Some(EntityKind::Patient),
        "hospital" => Some(EntityKind::Hospital),
        _ => None,
    }
}

fn map_transport_error(error: reqwest::Error) -> CredentialStoreError {
    CredentialStoreError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CredentialStoreError {
    let snippet: String = String::from_utf8_lossy(body).chars().take(200).collect();
    CredentialStoreError::rejected(format!("unexpected status {status}: {snippet}"))
}

fn record_from_dto(dto: CredentialRecordDto) -> Result<CredentialRecord, CredentialStoreError> {
    let login_id = LoginId::new(&dto.login_id).map_err(|err| {
        CredentialStoreError::rejected(format!(
            "identity store returned an invalid login id: {err}"
        ))
    })?;
    Ok(CredentialRecord {
        id: CredentialId::from_uuid(dto.credential_id),
        login_id,
        role: dto.role.as_deref().and_then(parse_role),
    })
}

#[async_trait]
impl CredentialStore for HttpCredentialStore {
    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let url = self.endpoint(&["credentials", "by-login", login_id.as_ref()])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let dto: CredentialRecordDto = serde_json::from_slice(body.as_ref()).map_err(|err| {
            CredentialStoreError::rejected(format!("invalid credential payload: {err}"))
        })?;
        record_from_dto(dto).map(Some)
    }

    async fn create_credential(
        &self,
        spec: &CredentialSpec,
    ) -> Result<CredentialId, CredentialStoreError> {
        let url = self.endpoint(&["credentials"])?;
        let body = CreateCredentialBody {
            login_id: spec.login_id().as_ref(),
            secret: spec.secret().expose(),
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(CredentialStoreError::login_taken(spec.login_id().as_ref()));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let dto: CreatedCredentialDto = serde_json::from_slice(body.as_ref()).map_err(|err| {
            CredentialStoreError::rejected(format!("invalid creation payload: {err}"))
        })?;
        Ok(CredentialId::from_uuid(dto.credential_id))
    }

    async fn assign_role(
        &self,
        id: CredentialId,
        role: EntityKind,
    ) -> Result<(), CredentialStoreError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["credentials", &id_segment, "role"])?;
        let response = self
            .client
            .put(url)
            .json(&AssignRoleBody { role: role.label() })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    async fn delete_credential(&self, id: CredentialId) -> Result<(), CredentialStoreError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["credentials", &id_segment])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        // Deleting an absent credential is a success: the desired end state
        // holds either way.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn adapter() -> HttpCredentialStore {
        let base_url = Url::parse("http://identity.local/api/").expect("valid base url");
        HttpCredentialStore::new(base_url).expect("client builds")
    }

    #[rstest]
    fn endpoint_joins_segments_under_the_base_path() {
        let url = adapter()
            .endpoint(&["credentials", "by-login", "a@x.com"])
            .expect("endpoint builds");
        assert_eq!(
            url.as_str(),
            "http://identity.local/api/credentials/by-login/a@x.com"
        );
    }

    #[rstest]
    #[case("doctor", Some(EntityKind::Doctor))]
    #[case("patient", Some(EntityKind::Patient))]
    #[case("hospital", Some(EntityKind::Hospital))]
    #[case("admin", None)]
    fn role_labels_parse_back(#[case] value: &str, #[case] expected: Option<EntityKind>) {
        assert_eq!(parse_role(value), expected);
    }

    #[rstest]
    fn every_kind_round_trips_through_its_label() {
        for kind in [EntityKind::Doctor, EntityKind::Patient, EntityKind::Hospital] {
            assert_eq!(parse_role(kind.label()), Some(kind));
        }
    }

    #[rstest]
    fn status_errors_carry_a_body_snippet() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, b"upstream exploded");
        assert!(matches!(err, CredentialStoreError::Rejected { .. }));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[rstest]
    fn record_dto_with_unknown_role_maps_to_none() {
        let dto = CredentialRecordDto {
            credential_id: Uuid::new_v4(),
            login_id: "a@x.com".to_owned(),
            role: Some("superuser".to_owned()),
        };
        let record = record_from_dto(dto).expect("valid record");
        assert_eq!(record.role, None);
    }

    #[rstest]
    fn record_dto_with_invalid_login_is_rejected() {
        let dto = CredentialRecordDto {
            credential_id: Uuid::new_v4(),
            login_id: "not-an-address".to_owned(),
            role: None,
        };
        let err = record_from_dto(dto).expect_err("invalid login must fail");
        assert!(matches!(err, CredentialStoreError::Rejected { .. }));
    }
}
