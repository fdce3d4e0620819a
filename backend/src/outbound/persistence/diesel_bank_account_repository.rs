//! PostgreSQL-backed `BankAccountRepository` implementation using Diesel ORM.
//!
//! Every insert or update runs in one transaction that first locks the owning
//! legal entity row (`SELECT ... FOR UPDATE`). Concurrent writes for the same
//! entity therefore serialise, and a `ClearOthers` write clears sibling
//! primary flags before its own row lands. The partial unique index
//! `bank_accounts_one_primary_per_entity` backs this up; a violation surfaces
//! as [`BankAccountRepositoryError::PrimaryConflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{BankAccountRepository, BankAccountRepositoryError, PrimaryFlagPolicy};
use crate::domain::{BankAccount, BankAccountId, LegalEntityId};

use super::diesel_basic_error_mapping::{
    ViolationKind, map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{BankAccountRow, BankAccountUpdate, NewBankAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bank_accounts, legal_entities};

const PRIMARY_INDEX: &str = "bank_accounts_one_primary_per_entity";
const PRIMARY_KEY: &str = "bank_accounts_pkey";

/// Diesel-backed implementation of the `BankAccountRepository` port.
#[derive(Clone)]
pub struct DieselBankAccountRepository {
    pool: DbPool,
}

impl DieselBankAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a write transaction, before it is mapped to the port
/// error. Any variant rolls the transaction back.
#[derive(Debug)]
enum WriteError {
    Diesel(diesel::result::Error),
    LegalEntityMissing,
    AccountMissing,
    ClearPrimary(diesel::result::Error),
}

impl From<diesel::result::Error> for WriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> BankAccountRepositoryError {
    map_basic_pool_error(error, |message| BankAccountRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> BankAccountRepositoryError {
    map_basic_diesel_error(
        error,
        |message| BankAccountRepositoryError::query(message),
        |message| BankAccountRepositoryError::connection(message),
    )
}

/// Map a failed write for `account`, classifying constraint violations.
fn map_write_error(error: WriteError, account: &BankAccount) -> BankAccountRepositoryError {
    let owner = *account.legal_entity_id.as_uuid();
    match error {
        WriteError::LegalEntityMissing => BankAccountRepositoryError::legal_entity_missing(owner),
        WriteError::AccountMissing => BankAccountRepositoryError::query("bank account vanished"),
        WriteError::ClearPrimary(error) => {
            BankAccountRepositoryError::clear_primary(owner, error.to_string())
        }
        WriteError::Diesel(error) => {
            if let Some(constraint) = violated_constraint(&error, ViolationKind::Unique) {
                match constraint {
                    PRIMARY_INDEX => return BankAccountRepositoryError::primary_conflict(owner),
                    PRIMARY_KEY => {
                        return BankAccountRepositoryError::duplicate_id(*account.id.as_uuid());
                    }
                    _ => {}
                }
            }
            if violated_constraint(&error, ViolationKind::ForeignKey).is_some() {
                return BankAccountRepositoryError::legal_entity_missing(owner);
            }
            map_diesel_error(error)
        }
    }
}

fn row_to_account(row: BankAccountRow) -> BankAccount {
    BankAccount {
        id: BankAccountId::from_uuid(row.id),
        legal_entity_id: LegalEntityId::from_uuid(row.legal_entity_id),
        bic: row.bic,
        bank_name: row.bank_name,
        bank_address: row.bank_address,
        settlement_account: row.settlement_account,
        correspondent_account: row.correspondent_account,
        currency: row.currency,
        comment: row.comment,
        is_primary: row.is_primary,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Lock the owning entity row for the rest of the transaction.
async fn lock_active_owner(conn: &mut AsyncPgConnection, owner: Uuid) -> Result<(), WriteError> {
    let locked: Option<Uuid> = legal_entities::table
        .filter(legal_entities::id.eq(owner))
        .filter(legal_entities::deleted_at.is_null())
        .select(legal_entities::id)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    locked.map(|_| ()).ok_or(WriteError::LegalEntityMissing)
}

/// Clear the primary flag on every account of `owner` except `keep`.
async fn clear_other_primaries(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    keep: Uuid,
    at: DateTime<Utc>,
) -> Result<usize, WriteError> {
    diesel::update(
        bank_accounts::table
            .filter(bank_accounts::legal_entity_id.eq(owner))
            .filter(bank_accounts::is_primary.eq(true))
            .filter(bank_accounts::id.ne(keep)),
    )
    .set((
        bank_accounts::is_primary.eq(false),
        bank_accounts::updated_at.eq(at),
    ))
    .execute(conn)
    .await
    .map_err(WriteError::ClearPrimary)
}

async fn prepare_owner(
    conn: &mut AsyncPgConnection,
    account: &BankAccount,
    policy: PrimaryFlagPolicy,
) -> Result<(), WriteError> {
    let owner = *account.legal_entity_id.as_uuid();
    lock_active_owner(conn, owner).await?;
    if policy == PrimaryFlagPolicy::ClearOthers {
        let cleared =
            clear_other_primaries(conn, owner, *account.id.as_uuid(), account.updated_at).await?;
        tracing::debug!(legal_entity_id = %owner, cleared, "cleared competing primary flags");
    }
    Ok(())
}

#[async_trait]
impl BankAccountRepository for DieselBankAccountRepository {
    async fn find_by_id(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<BankAccount>, BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BankAccountRow> = bank_accounts::table
            .filter(bank_accounts::id.eq(id.as_uuid()))
            .select(BankAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_account))
    }

    async fn list_by_legal_entity(
        &self,
        legal_entity_id: &LegalEntityId,
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BankAccountRow> = bank_accounts::table
            .filter(bank_accounts::legal_entity_id.eq(legal_entity_id.as_uuid()))
            .order((bank_accounts::created_at.asc(), bank_accounts::id.asc()))
            .select(BankAccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_account).collect())
    }

    async fn list_by_legal_entities(
        &self,
        legal_entity_ids: &[LegalEntityId],
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError> {
        if legal_entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = legal_entity_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BankAccountRow> = bank_accounts::table
            .filter(bank_accounts::legal_entity_id.eq_any(ids))
            .order((bank_accounts::created_at.asc(), bank_accounts::id.asc()))
            .select(BankAccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_account).collect())
    }

    async fn insert(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<(), BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBankAccountRow {
            id: *account.id.as_uuid(),
            legal_entity_id: *account.legal_entity_id.as_uuid(),
            bic: &account.bic,
            bank_name: &account.bank_name,
            bank_address: account.bank_address.as_deref(),
            settlement_account: &account.settlement_account,
            correspondent_account: account.correspondent_account.as_deref(),
            currency: &account.currency,
            comment: account.comment.as_deref(),
            is_primary: account.is_primary,
            created_at: account.created_at,
            updated_at: account.updated_at,
        };

        conn.transaction::<_, WriteError, _>(|conn| {
            async move {
                prepare_owner(conn, account, policy).await?;
                diesel::insert_into(bank_accounts::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_write_error(err, account))
    }

    async fn update(
        &self,
        account: &BankAccount,
        policy: PrimaryFlagPolicy,
    ) -> Result<bool, BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *account.id.as_uuid();
        let changes = BankAccountUpdate {
            legal_entity_id: *account.legal_entity_id.as_uuid(),
            bic: &account.bic,
            bank_name: &account.bank_name,
            bank_address: account.bank_address.as_deref(),
            settlement_account: &account.settlement_account,
            correspondent_account: account.correspondent_account.as_deref(),
            currency: &account.currency,
            comment: account.comment.as_deref(),
            is_primary: account.is_primary,
            updated_at: account.updated_at,
        };

        let result = conn
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    prepare_owner(conn, account, policy).await?;
                    let updated = diesel::update(bank_accounts::table.find(id))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Err(WriteError::AccountMissing);
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(WriteError::AccountMissing) => Ok(false),
            Err(err) => Err(map_write_error(err, account)),
        }
    }

    async fn delete(&self, id: &BankAccountId) -> Result<bool, BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(bank_accounts::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn clear_primary_flag(
        &self,
        legal_entity_id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<usize, BankAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(
            bank_accounts::table
                .filter(bank_accounts::legal_entity_id.eq(legal_entity_id.as_uuid()))
                .filter(bank_accounts::is_primary.eq(true)),
        )
        .set((
            bank_accounts::is_primary.eq(false),
            bank_accounts::updated_at.eq(at),
        ))
        .execute(&mut conn)
        .await
        .map_err(|err| {
            BankAccountRepositoryError::clear_primary(*legal_entity_id.as_uuid(), err.to_string())
        })
    }
}
