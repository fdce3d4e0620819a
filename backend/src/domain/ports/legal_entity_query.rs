//! Driving port for legal entity reads with nested bank accounts.

use async_trait::async_trait;

use crate::domain::{Error, LegalEntityId, LegalEntityWithAccounts};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegalEntityQuery: Send + Sync {
    /// Every active entity with its accounts.
    async fn list(&self) -> Result<Vec<LegalEntityWithAccounts>, Error>;

    /// One active entity with its accounts; `not_found` otherwise.
    async fn get(&self, id: LegalEntityId) -> Result<LegalEntityWithAccounts, Error>;
}
