//! Driving port for bank account mutations under the primary-account rule.

use async_trait::async_trait;

use crate::domain::{BankAccount, BankAccountDraft, BankAccountId, Error};

/// Input for creating a bank account. A missing `id` is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBankAccountRequest {
    pub id: Option<BankAccountId>,
    pub account: BankAccountDraft,
}

/// Full-replace update of an existing bank account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBankAccountRequest {
    pub id: BankAccountId,
    pub account: BankAccountDraft,
}

/// Bank account mutations.
///
/// Writing an account with `is_primary = true` clears the flag on every
/// other account of the same legal entity as part of the same write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankAccountCommand: Send + Sync {
    async fn create(&self, request: CreateBankAccountRequest) -> Result<BankAccount, Error>;

    async fn update(&self, request: UpdateBankAccountRequest) -> Result<BankAccount, Error>;

    async fn delete(&self, id: BankAccountId) -> Result<(), Error>;
}
