//! Bank account entity and its candidate input.
//!
//! Accounts are owned by a [`LegalEntity`](super::LegalEntity). At most one
//! account per entity carries the primary flag; the services enforce that by
//! asking storage to clear competing flags in the same write.

mod validation;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LegalEntityId;

pub use validation::{BANK_NAME_MAX, BankAccountValidationError, validate_bank_account};

/// Currency assumed when a request omits one.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Stable bank account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankAccountId(Uuid);

impl BankAccountId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BankAccountId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for BankAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Candidate bank account as supplied by a caller, before validation.
///
/// Optional text fields given as empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountDraft {
    pub legal_entity_id: LegalEntityId,
    pub bic: String,
    pub bank_name: String,
    pub bank_address: Option<String>,
    pub settlement_account: String,
    pub correspondent_account: Option<String>,
    pub currency: Option<String>,
    pub comment: Option<String>,
    pub is_primary: bool,
}

impl BankAccountDraft {
    /// Correspondent account, with blank input treated as absent.
    pub fn correspondent_account(&self) -> Option<&str> {
        non_blank(self.correspondent_account.as_deref())
    }

    /// Currency code, with blank input treated as absent.
    pub fn currency(&self) -> Option<&str> {
        non_blank(self.currency.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn non_blank_owned(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Persisted bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    pub legal_entity_id: LegalEntityId,
    pub bic: String,
    pub bank_name: String,
    pub bank_address: Option<String>,
    pub settlement_account: String,
    pub correspondent_account: Option<String>,
    pub currency: String,
    pub comment: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BankAccount {
    /// Build a stored account from a draft that has already passed
    /// [`validate_bank_account`].
    ///
    /// Updates pass the stored `created_at` so the creation time survives a
    /// full replace.
    pub fn from_validated(
        id: BankAccountId,
        draft: BankAccountDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let BankAccountDraft {
            legal_entity_id,
            bic,
            bank_name,
            bank_address,
            settlement_account,
            correspondent_account,
            currency,
            comment,
            is_primary,
        } = draft;
        Self {
            id,
            legal_entity_id,
            bic,
            bank_name,
            bank_address: non_blank_owned(bank_address),
            settlement_account,
            correspondent_account: non_blank_owned(correspondent_account),
            currency: non_blank_owned(currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            comment: non_blank_owned(comment),
            is_primary,
            created_at,
            updated_at,
        }
    }
}
