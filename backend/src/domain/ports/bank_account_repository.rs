//! Port for bank account persistence and primary-flag maintenance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BankAccount, BankAccountId, LegalEntityId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bank account repository adapters.
    pub enum BankAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bank account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bank account repository query failed: {message}",
        /// The owning legal entity is absent or soft-deleted at write time.
        LegalEntityMissing { legal_entity_id: Uuid } =>
            "legal entity {legal_entity_id} does not exist",
        /// An account with the same id already exists.
        DuplicateId { id: Uuid } => "bank account {id} already exists",
        /// Storage refused a second primary account for the entity.
        PrimaryConflict { legal_entity_id: Uuid } =>
            "legal entity {legal_entity_id} already has a primary bank account",
        /// Clearing competing primary flags failed; nothing was written.
        ClearPrimary { legal_entity_id: Uuid, message: String } =>
            "clearing primary flag for legal entity {legal_entity_id} failed: {message}",
    }
}

/// How a write treats the primary flag of sibling accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryFlagPolicy {
    /// Leave other accounts untouched.
    Keep,
    /// Clear the flag on every other account of the owning entity in the
    /// same transaction as the write, before the write.
    ClearOthers,
}

impl PrimaryFlagPolicy {
    /// Policy for persisting `account`: promote only when it is primary.
    pub const fn for_account(account: &BankAccount) -> Self {
        if account.is_primary {
            Self::ClearOthers
        } else {
            Self::Keep
        }
    }
}

/// Storage operations for bank accounts.
///
/// `insert` and `update` fail with
/// [`BankAccountRepositoryError::LegalEntityMissing`] when the owning entity
/// is not active, leaving storage unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<BankAccount>, BankAccountRepositoryError>;

    /// Accounts of one entity ordered by creation time.
    async fn list_by_legal_entity(
        &self,
        legal_entity_id: &LegalEntityId,
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError>;

    /// Accounts of several entities in one round trip.
    async fn list_by_legal_entities(
        &self,
        legal_entity_ids: &[LegalEntityId],
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError>;

    async fn insert(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<(), BankAccountRepositoryError>;

    /// Full replace of a stored account. Returns `false` when the id is
    /// unknown.
    async fn update(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<bool, BankAccountRepositoryError>;

    /// Hard delete. Returns `false` when the id is unknown.
    async fn delete(&self, id: &BankAccountId) -> Result<bool, BankAccountRepositoryError>;

    /// Set `is_primary = false` on every primary account of the entity,
    /// stamping `updated_at` with `at`, and return how many rows changed.
    /// Zero rows is a successful no-op.
    async fn clear_primary_flag(
        &self,
        legal_entity_id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<usize, BankAccountRepositoryError>;
}
