//! Compensation bookkeeping for the provisioning saga.
//!
//! Every committed step records its inverse here. On a later failure the
//! saga unwinds the recorded actions in reverse order; the log is scoped to
//! a single saga run and dropped on every exit path.

use super::address::AddressId;
use super::contact::ContactId;
use super::credential::CredentialId;

/// Inverse operation for one committed provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationAction {
    /// Remove the credential record created in the identity store.
    DeleteCredential(CredentialId),
    /// Remove the address row committed to the domain store.
    DeleteAddress(AddressId),
    /// Remove the contact row committed to the domain store.
    DeleteContact(ContactId),
}

impl CompensationAction {
    /// Stable label naming the residual record if this action fails.
    pub fn residual_label(&self) -> &'static str {
        match self {
            Self::DeleteCredential(_) => "credential",
            Self::DeleteAddress(_) => "address",
            Self::DeleteContact(_) => "contact",
        }
    }

    /// Identifier of the record this action removes.
    pub fn target_id(&self) -> uuid::Uuid {
        match self {
            Self::DeleteCredential(id) => *id.as_uuid(),
            Self::DeleteAddress(id) => *id.as_uuid(),
            Self::DeleteContact(id) => *id.as_uuid(),
        }
    }
}

/// Ordered list of compensations recorded by one saga run.
#[derive(Debug, Default)]
pub struct CompensationLog {
    actions: Vec<CompensationAction>,
}

impl CompensationLog {
    /// Start an empty log for a new saga run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the inverse of a step that has just committed.
    pub fn record(&mut self, action: CompensationAction) {
        self.actions.push(action);
    }

    /// True when no step with an inverse has committed yet.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Consume the log, yielding actions in unwind (reverse-commit) order.
    pub fn into_unwind_order(self) -> Vec<CompensationAction> {
        let mut actions = self.actions;
        actions.reverse();
        actions
    }
}
