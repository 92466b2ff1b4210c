//! Credential primitives shared with the identity store.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before the saga talks to the identity port.
//! The secret is zeroised on drop and never leaves the process except inside
//! an outbound create-credential call.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::EntityKind;
use super::id::define_uuid_id;

define_uuid_id! {
    /// Opaque identifier assigned by the identity store.
    CredentialId
}

/// Minimum allowed secret length.
pub const SECRET_MIN: usize = 8;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Login identifier was missing or blank once trimmed.
    EmptyLoginId,
    /// Login identifier is not shaped like an e-mail address.
    InvalidLoginId,
    /// Secret was shorter than [`SECRET_MIN`] characters.
    SecretTooShort { min: usize },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLoginId => write!(f, "login identifier must not be empty"),
            Self::InvalidLoginId => {
                write!(f, "login identifier must be an e-mail address")
            }
            Self::SecretTooShort { min } => {
                write!(f, "secret must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

static LOGIN_ID_RE: OnceLock<Regex> = OnceLock::new();

fn login_id_regex() -> &'static Regex {
    LOGIN_ID_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("login id regex failed to compile: {error}"))
    })
}

/// Login identifier for a credential record, normalised to lowercase.
///
/// ## Invariants
/// - trimmed, non-empty, e-mail shaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginId(String);

impl LoginId {
    /// Validate and construct a [`LoginId`] from borrowed input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CredentialValidationError> {
        Self::from_owned(value.as_ref().to_owned())
    }

    fn from_owned(value: String) -> Result<Self, CredentialValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CredentialValidationError::EmptyLoginId);
        }
        if !login_id_regex().is_match(trimmed) {
            return Err(CredentialValidationError::InvalidLoginId);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for LoginId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoginId> for String {
    fn from(value: LoginId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoginId {
    type Error = CredentialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Credential secret, zeroised on drop.
///
/// ## Invariants
/// - at least [`SECRET_MIN`] characters; caller-provided whitespace is kept
///   to avoid surprising credential comparisons.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Validate and construct a [`Secret`].
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let value = value.into();
        if value.chars().count() < SECRET_MIN {
            return Err(CredentialValidationError::SecretTooShort { min: SECRET_MIN });
        }
        Ok(Self(Zeroizing::new(value)))
    }

    /// Secret material for outbound identity calls.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-encoded SHA-256 fingerprint of the secret material.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(digest)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Validated credential fields of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSpec {
    login_id: LoginId,
    secret: Secret,
}

impl CredentialSpec {
    /// Construct a spec from raw login-id/secret inputs.
    pub fn try_from_parts(
        login_id: &str,
        secret: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            login_id: LoginId::new(login_id)?,
            secret: Secret::new(secret)?,
        })
    }

    /// Build a spec from already validated components.
    pub fn new(login_id: LoginId, secret: Secret) -> Self {
        Self { login_id, secret }
    }

    /// Login identifier to register with the identity store.
    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    /// Secret to register with the identity store.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }
}

/// Identity-store view of a credential.
///
/// The secret is write-only: the identity store never echoes it back, so the
/// record carries only the login identifier and the assigned role. The role
/// is absent between credential creation and role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: CredentialId,
    pub login_id: LoginId,
    pub role: Option<EntityKind>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CredentialValidationError::EmptyLoginId)]
    #[case("   ", CredentialValidationError::EmptyLoginId)]
    #[case("not-an-address", CredentialValidationError::InvalidLoginId)]
    #[case("a@b", CredentialValidationError::InvalidLoginId)]
    #[case("two@@x.com", CredentialValidationError::InvalidLoginId)]
    fn invalid_login_ids(#[case] input: &str, #[case] expected: CredentialValidationError) {
        let err = LoginId::new(input).expect_err("invalid login ids must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("a@x.com", "a@x.com")]
    #[case("  Dr.House@Clinic.example  ", "dr.house@clinic.example")]
    fn valid_login_ids_normalise(#[case] input: &str, #[case] expected: &str) {
        let login = LoginId::new(input).expect("valid login id");
        assert_eq!(login.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("short")]
    #[case("seven77")]
    fn short_secrets_are_rejected(#[case] input: &str) {
        let err = Secret::new(input).expect_err("short secrets must fail");
        assert_eq!(err, CredentialValidationError::SecretTooShort { min: SECRET_MIN });
    }

    #[rstest]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("correct horse battery staple").expect("valid secret");
        assert_eq!(format!("{secret:?}"), "Secret(<redacted>)");
    }

    #[rstest]
    fn fingerprint_is_deterministic_and_hex() {
        let a = Secret::new("swordfish1").expect("valid secret");
        let b = Secret::new("swordfish1").expect("valid secret");
        let c = Secret::new("swordfish2").expect("valid secret");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        assert!(a.fingerprint().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[rstest]
    fn spec_from_parts_validates_both_fields() {
        let spec = CredentialSpec::try_from_parts("a@x.com", "longenough")
            .expect("valid credential spec");
        assert_eq!(spec.login_id().as_ref(), "a@x.com");
        assert_eq!(spec.secret().expose(), "longenough");

        CredentialSpec::try_from_parts("bad", "longenough")
            .expect_err("invalid login id must fail");
        CredentialSpec::try_from_parts("a@x.com", "tiny").expect_err("short secret must fail");
    }
}
