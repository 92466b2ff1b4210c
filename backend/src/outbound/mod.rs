//! Outbound adapters: PostgreSQL persistence and the identity-store client.

pub mod identity;
pub mod persistence;
