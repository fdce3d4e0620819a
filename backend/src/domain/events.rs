//! Creation events announced to downstream consumers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{BankAccount, LegalEntity};

/// Which aggregate an event announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LegalEntityCreated,
    BankAccountCreated,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LegalEntityCreated => "legal-entity-created",
            Self::BankAccountCreated => "bank-account-created",
        }
    }
}

/// Wire payload shared by every creation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedMessage {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Event emitted after a create commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationEvent {
    pub kind: EventKind,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CreationEvent {
    pub fn legal_entity_created(entity: &LegalEntity) -> Self {
        Self {
            kind: EventKind::LegalEntityCreated,
            id: *entity.id().as_uuid(),
            created_at: entity.created_at(),
        }
    }

    pub fn bank_account_created(account: &BankAccount) -> Self {
        Self {
            kind: EventKind::BankAccountCreated,
            id: *account.id.as_uuid(),
            created_at: account.created_at,
        }
    }

    /// Payload published to the broker.
    pub fn message(&self) -> CreatedMessage {
        CreatedMessage {
            id: self.id.to_string(),
            created_at: self.created_at,
        }
    }
}
