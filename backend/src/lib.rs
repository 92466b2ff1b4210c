//! Provisioning backend library modules.
//!
//! The crate is organised hexagonally: `domain` holds entities, driving and
//! driven ports, and the provisioning saga; `outbound` holds the PostgreSQL
//! persistence adapters and the identity-store client. Inbound transport
//! adapters live outside this crate.

pub mod domain;
pub mod outbound;
