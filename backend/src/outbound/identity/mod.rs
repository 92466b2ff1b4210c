//! Identity-store client adapters.

mod http_credential_store;

pub use http_credential_store::HttpCredentialStore;
