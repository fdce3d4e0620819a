//! Legal entity domain service.
//!
//! Implements the legal entity driving ports on top of the two repositories.
//! Reads pair every active entity with its bank accounts; deletion is soft.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{
    BankAccountRepository, CreateLegalEntityRequest, LegalEntityCommand, LegalEntityQuery,
    LegalEntityRepository, UpdateLegalEntityRequest,
};
use crate::domain::repository_errors::{
    invalid_legal_entity, legal_entity_not_found, map_bank_account_error, map_legal_entity_error,
};
use crate::domain::{
    BankAccount, CreationEvent, Error, LegalEntity, LegalEntityDraft, LegalEntityId,
    LegalEntityMeta, LegalEntityName, LegalEntityWithAccounts, Notifier,
};

/// Legal entity service implementing [`LegalEntityCommand`] and
/// [`LegalEntityQuery`].
#[derive(Clone)]
pub struct LegalEntityService<L, B> {
    legal_entities: Arc<L>,
    bank_accounts: Arc<B>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl<L, B> LegalEntityService<L, B> {
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

fn parse_meta(meta: Option<Value>) -> Result<Option<LegalEntityMeta>, Error> {
    meta.map(LegalEntityMeta::try_from)
        .transpose()
        .map_err(invalid_legal_entity)
}

impl<L, B> LegalEntityService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn require_active(&self, id: LegalEntityId, operation: &str) -> Result<LegalEntity, Error> {
        self.legal_entities
            .find_active(&id)
            .await
            .map_err(|err| map_legal_entity_error(err, operation))?
            .ok_or_else(|| legal_entity_not_found(id))
    }
}

#[async_trait]
impl<L, B> LegalEntityCommand for LegalEntityService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn create(&self, request: CreateLegalEntityRequest) -> Result<LegalEntity, Error> {
        let CreateLegalEntityRequest {
            name,
            created_by,
            meta,
        } = request;
        let name = LegalEntityName::new(name).map_err(invalid_legal_entity)?;
        let meta = parse_meta(meta)?.unwrap_or_default();

        let entity = LegalEntity::register(
            LegalEntityId::random(),
            LegalEntityDraft {
                name,
                created_by,
                meta,
            },
            self.clock.utc(),
        );
        self.legal_entities
            .insert(&entity)
            .await
            .map_err(|err| map_legal_entity_error(err, "creating legal entity"))?;
        info!(legal_entity_id = %entity.id(), "legal entity created");

        self.notifier
            .notify(CreationEvent::legal_entity_created(&entity))
            .await;
        Ok(entity)
    }

    async fn update(&self, request: UpdateLegalEntityRequest) -> Result<LegalEntity, Error> {
        let UpdateLegalEntityRequest { id, name, meta } = request;
        let name = LegalEntityName::new(name).map_err(invalid_legal_entity)?;
        let meta = parse_meta(meta)?;

        let mut entity = self.require_active(id, "updating legal entity").await?;
        let now = self.clock.utc();
        entity.rename(name, now);
        if let Some(meta) = meta {
            entity.replace_meta(meta, now);
        }

        let matched = self
            .legal_entities
            .update(&entity)
            .await
            .map_err(|err| map_legal_entity_error(err, "updating legal entity"))?;
        if !matched {
            return Err(legal_entity_not_found(id));
        }
        info!(legal_entity_id = %id, "legal entity updated");
        Ok(entity)
    }

    async fn delete(&self, id: LegalEntityId) -> Result<(), Error> {
        let deleted = self
            .legal_entities
            .soft_delete(&id, self.clock.utc())
            .await
            .map_err(|err| map_legal_entity_error(err, "deleting legal entity"))?;
        if !deleted {
            return Err(legal_entity_not_found(id));
        }
        info!(legal_entity_id = %id, "legal entity deleted");
        Ok(())
    }
}

#[async_trait]
impl<L, B> LegalEntityQuery for LegalEntityService<L, B>
where
    L: LegalEntityRepository,
    B: BankAccountRepository,
{
    async fn list(&self) -> Result<Vec<LegalEntityWithAccounts>, Error> {
        let entities = self
            .legal_entities
            .list_active()
            .await
            .map_err(|err| map_legal_entity_error(err, "listing legal entities"))?;
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<LegalEntityId> = entities.iter().map(LegalEntity::id).collect();
        let accounts = self
            .bank_accounts
            .list_by_legal_entities(&ids)
            .await
            .map_err(|err| map_bank_account_error(err, "listing legal entities"))?;

        let mut by_owner: HashMap<LegalEntityId, Vec<BankAccount>> = HashMap::new();
        for account in accounts {
            by_owner
                .entry(account.legal_entity_id)
                .or_default()
                .push(account);
        }

        Ok(entities
            .into_iter()
            .map(|entity| LegalEntityWithAccounts {
                bank_accounts: by_owner.remove(&entity.id()).unwrap_or_default(),
                entity,
            })
            .collect())
    }

    async fn get(&self, id: LegalEntityId) -> Result<LegalEntityWithAccounts, Error> {
        let entity = self.require_active(id, "loading legal entity").await?;
        let bank_accounts = self
            .bank_accounts
            .list_by_legal_entity(&id)
            .await
            .map_err(|err| map_bank_account_error(err, "loading legal entity"))?;
        Ok(LegalEntityWithAccounts {
            entity,
            bank_accounts,
        })
    }
}

#[cfg(test)]
#[path = "legal_entity_service_tests.rs"]
mod tests;
