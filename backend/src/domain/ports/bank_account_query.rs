//! Driving port for bank account reads.

use async_trait::async_trait;

use crate::domain::{BankAccount, BankAccountId, Error, LegalEntityId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankAccountQuery: Send + Sync {
    async fn get(&self, id: BankAccountId) -> Result<BankAccount, Error>;

    /// Accounts of an active legal entity. An entity without accounts yields
    /// an empty list; an unknown entity yields `not_found`.
    async fn list_for_legal_entity(
        &self,
        legal_entity_id: LegalEntityId,
    ) -> Result<Vec<BankAccount>, Error>;
}
