//! In-process store implementing both repository ports.
//!
//! Used when no database is configured and by the integration tests. One
//! lock guards entities and accounts together, so the ownership check, the
//! primary-flag clear and the write happen as a single step.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{
    BankAccountRepository, BankAccountRepositoryError, LegalEntityRepository,
    LegalEntityRepositoryError, PrimaryFlagPolicy,
};
use crate::domain::{
    BankAccount, BankAccountId, LegalEntity, LegalEntityId, LegalEntityParts, LegalEntityState,
};

#[derive(Default)]
struct StoreState {
    legal_entities: HashMap<LegalEntityId, LegalEntity>,
    bank_accounts: HashMap<BankAccountId, BankAccount>,
}

impl StoreState {
    fn is_active(&self, id: &LegalEntityId) -> bool {
        self.legal_entities
            .get(id)
            .is_some_and(|entity| entity.state().is_active())
    }

    fn clear_primaries(
        &mut self,
        owner: LegalEntityId,
        keep: Option<BankAccountId>,
        at: DateTime<Utc>,
    ) -> usize {
        let mut cleared = 0;
        for account in self.bank_accounts.values_mut() {
            if account.legal_entity_id == owner && account.is_primary && Some(account.id) != keep {
                account.is_primary = false;
                account.updated_at = at;
                cleared += 1;
            }
        }
        cleared
    }

    /// Shared preamble of every account write.
    fn prepare_write(
        &mut self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<(), BankAccountRepositoryError> {
        if !self.is_active(&account.legal_entity_id) {
            return Err(BankAccountRepositoryError::legal_entity_missing(
                *account.legal_entity_id.as_uuid(),
            ));
        }
        if policy == PrimaryFlagPolicy::ClearOthers {
            self.clear_primaries(account.legal_entity_id, Some(account.id), account.updated_at);
        } else if account.is_primary && self.has_other_primary(account) {
            return Err(BankAccountRepositoryError::primary_conflict(
                *account.legal_entity_id.as_uuid(),
            ));
        }
        Ok(())
    }

    fn has_other_primary(&self, account: &BankAccount) -> bool {
        self.bank_accounts.values().any(|other| {
            other.legal_entity_id == account.legal_entity_id
                && other.is_primary
                && other.id != account.id
        })
    }
}

fn sorted_accounts<'a>(accounts: impl Iterator<Item = &'a BankAccount>) -> Vec<BankAccount> {
    let mut accounts: Vec<BankAccount> = accounts.cloned().collect();
    accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    accounts
}

/// Shared in-memory store. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LegalEntityRepository for InMemoryStore {
    async fn list_active(&self) -> Result<Vec<LegalEntity>, LegalEntityRepositoryError> {
        let state = self.state.read().await;
        let mut entities: Vec<LegalEntity> = state
            .legal_entities
            .values()
            .filter(|entity| entity.state().is_active())
            .cloned()
            .collect();
        entities.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then(a.id().cmp(&b.id()))
        });
        Ok(entities)
    }

    async fn find_active(
        &self,
        id: &LegalEntityId,
    ) -> Result<Option<LegalEntity>, LegalEntityRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .legal_entities
            .get(id)
            .filter(|entity| entity.state().is_active())
            .cloned())
    }

    async fn insert(&self, entity: &LegalEntity) -> Result<(), LegalEntityRepositoryError> {
        let mut state = self.state.write().await;
        if state.legal_entities.contains_key(&entity.id()) {
            return Err(LegalEntityRepositoryError::query(format!(
                "legal entity {} already exists",
                entity.id()
            )));
        }
        state.legal_entities.insert(entity.id(), entity.clone());
        Ok(())
    }

    async fn update(&self, entity: &LegalEntity) -> Result<bool, LegalEntityRepositoryError> {
        let mut state = self.state.write().await;
        if !state.is_active(&entity.id()) {
            return Ok(false);
        }
        state.legal_entities.insert(entity.id(), entity.clone());
        Ok(true)
    }

    async fn soft_delete(
        &self,
        id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<bool, LegalEntityRepositoryError> {
        let mut state = self.state.write().await;
        let Some(entity) = state
            .legal_entities
            .get(id)
            .filter(|entity| entity.state().is_active())
        else {
            return Ok(false);
        };
        let deleted = LegalEntity::from_parts(LegalEntityParts {
            id: entity.id(),
            name: entity.name().clone(),
            created_by: entity.created_by().cloned(),
            meta: entity.meta().clone(),
            created_at: entity.created_at(),
            updated_at: at,
            state: LegalEntityState::Deleted { at },
        });
        state.legal_entities.insert(*id, deleted);
        Ok(true)
    }
}

#[async_trait]
impl BankAccountRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<BankAccount>, BankAccountRepositoryError> {
        Ok(self.state.read().await.bank_accounts.get(id).cloned())
    }

    async fn list_by_legal_entity(
        &self,
        legal_entity_id: &LegalEntityId,
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError> {
        let state = self.state.read().await;
        Ok(sorted_accounts(
            state
                .bank_accounts
                .values()
                .filter(|account| account.legal_entity_id == *legal_entity_id),
        ))
    }

    async fn list_by_legal_entities(
        &self,
        legal_entity_ids: &[LegalEntityId],
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError> {
        let state = self.state.read().await;
        Ok(sorted_accounts(
            state
                .bank_accounts
                .values()
                .filter(|account| legal_entity_ids.contains(&account.legal_entity_id)),
        ))
    }

    async fn insert(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<(), BankAccountRepositoryError> {
        let mut state = self.state.write().await;
        if state.bank_accounts.contains_key(&account.id) {
            return Err(BankAccountRepositoryError::duplicate_id(*account.id.as_uuid()));
        }
        state.prepare_write(account, policy)?;
        state.bank_accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<bool, BankAccountRepositoryError> {
        let mut state = self.state.write().await;
        if !state.bank_accounts.contains_key(&account.id) {
            return Ok(false);
        }
        state.prepare_write(account, policy)?;
        state.bank_accounts.insert(account.id, account.clone());
        Ok(true)
    }

    async fn delete(&self, id: &BankAccountId) -> Result<bool, BankAccountRepositoryError> {
        Ok(self.state.write().await.bank_accounts.remove(id).is_some())
    }

    async fn clear_primary_flag(
        &self,
        legal_entity_id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<usize, BankAccountRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.clear_primaries(*legal_entity_id, None, at))
    }
}
