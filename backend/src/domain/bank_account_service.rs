//! Bank account domain service.
//!
//! Owns the primary-account rule: whenever a write leaves an account marked
//! primary, storage is told to clear the flag on every sibling account in the
//! same transaction. A failed clear aborts the write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    BankAccountCommand, BankAccountQuery, BankAccountRepository, CreateBankAccountRequest,
    LegalEntityRepository, PrimaryFlagPolicy, UpdateBankAccountRequest,
};
use crate::domain::repository_errors::{
    bank_account_not_found, invalid_bank_account, legal_entity_not_found, map_bank_account_error,
    map_legal_entity_error,
};
use crate::domain::{
    BankAccount, BankAccountId, CreationEvent, Error, LegalEntityId, Notifier,
    validate_bank_account,
};

/// Bank account service implementing [`BankAccountCommand`] and
/// [`BankAccountQuery`].
#[derive(Clone)]
pub struct BankAccountService<L, B> {
    legal_entities: Arc<L>,
    bank_accounts: Arc<B>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl<L, B> BankAccountService<L, B> {
    pub fn new(
        legal_entities: Arc<L>,
        bank_accounts: Arc<B>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            legal_entities,
            bank_accounts,
            notifier,
            clock,
        }
    }
}

impl<L, B> BankAccountService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn ensure_legal_entity(&self, id: LegalEntityId, operation: &str) -> Result<(), Error> {
        self.legal_entities
            .find_active(&id)
            .await
            .map_err(|err| map_legal_entity_error(err, operation))?
            .map(|_| ())
            .ok_or_else(|| legal_entity_not_found(id))
    }

    async fn load(&self, id: BankAccountId, operation: &str) -> Result<BankAccount, Error> {
        self.bank_accounts
            .find_by_id(&id)
            .await
            .map_err(|err| map_bank_account_error(err, operation))?
            .ok_or_else(|| bank_account_not_found(id))
    }
}

#[async_trait]
impl<L, B> BankAccountCommand for BankAccountService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn create(&self, request: CreateBankAccountRequest) -> Result<BankAccount, Error> {
        const OPERATION: &str = "creating bank account";
        let CreateBankAccountRequest { id, account } = request;
        validate_bank_account(&account).map_err(invalid_bank_account)?;
        self.ensure_legal_entity(account.legal_entity_id, OPERATION)
            .await?;

        let now = self.clock.utc();
        let account =
            BankAccount::from_validated(id.unwrap_or_else(BankAccountId::random), account, now, now);
        let policy = PrimaryFlagPolicy::for_account(&account);
        self.bank_accounts
            .insert(&account, policy)
            .await
            .map_err(|err| map_bank_account_error(err, OPERATION))?;
        info!(
            bank_account_id = %account.id,
            legal_entity_id = %account.legal_entity_id,
            is_primary = account.is_primary,
            "bank account created"
        );

        self.notifier
            .notify(CreationEvent::bank_account_created(&account))
            .await;
        Ok(account)
    }

    async fn update(&self, request: UpdateBankAccountRequest) -> Result<BankAccount, Error> {
        const OPERATION: &str = "updating bank account";
        let UpdateBankAccountRequest { id, account } = request;
        validate_bank_account(&account).map_err(invalid_bank_account)?;

        let existing = self.load(id, OPERATION).await?;
        if existing.legal_entity_id != account.legal_entity_id {
            self.ensure_legal_entity(account.legal_entity_id, OPERATION)
                .await?;
        }

        let updated =
            BankAccount::from_validated(id, account, existing.created_at, self.clock.utc());
        // A sibling may have been promoted since `existing` was read, so a
        // primary write always clears under the adapter's lock.
        let policy = PrimaryFlagPolicy::for_account(&updated);
        let matched = self
            .bank_accounts
            .update(&updated, policy)
            .await
            .map_err(|err| map_bank_account_error(err, OPERATION))?;
        if !matched {
            return Err(bank_account_not_found(id));
        }
        info!(
            bank_account_id = %id,
            legal_entity_id = %updated.legal_entity_id,
            is_primary = updated.is_primary,
            "bank account updated"
        );
        Ok(updated)
    }

    async fn delete(&self, id: BankAccountId) -> Result<(), Error> {
        let deleted = self
            .bank_accounts
            .delete(&id)
            .await
            .map_err(|err| map_bank_account_error(err, "deleting bank account"))?;
        if !deleted {
            return Err(bank_account_not_found(id));
        }
        info!(bank_account_id = %id, "bank account deleted");
        Ok(())
    }
}

#[async_trait]
impl<L, B> BankAccountQuery for BankAccountService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn get(&self, id: BankAccountId) -> Result<BankAccount, Error> {
        self.load(id, "loading bank account").await
    }

    async fn list_for_legal_entity(
        &self,
        legal_entity_id: LegalEntityId,
    ) -> Result<Vec<BankAccount>, Error> {
        const OPERATION: &str = "listing bank accounts";
        self.ensure_legal_entity(legal_entity_id, OPERATION).await?;
        self.bank_accounts
            .list_by_legal_entity(&legal_entity_id)
            .await
            .map_err(|err| map_bank_account_error(err, OPERATION))
    }
}

#[cfg(test)]
#[path = "bank_account_service_tests.rs"]
mod tests;
