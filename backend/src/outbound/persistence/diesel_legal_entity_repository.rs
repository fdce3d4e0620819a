//! PostgreSQL-backed `LegalEntityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{LegalEntityRepository, LegalEntityRepositoryError};
use crate::domain::{
    CreatorRef, LegalEntity, LegalEntityId, LegalEntityMeta, LegalEntityName, LegalEntityParts,
    LegalEntityState,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LegalEntityRow, LegalEntityUpdate, NewLegalEntityRow};
use super::pool::{DbPool, PoolError};
use super::schema::legal_entities;

/// Diesel-backed implementation of the `LegalEntityRepository` port.
#[derive(Clone)]
pub struct DieselLegalEntityRepository {
    pool: DbPool,
}

impl DieselLegalEntityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LegalEntityRepositoryError {
    map_basic_pool_error(error, |message| LegalEntityRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> LegalEntityRepositoryError {
    map_basic_diesel_error(
        error,
        |message| LegalEntityRepositoryError::query(message),
        |message| LegalEntityRepositoryError::connection(message),
    )
}

/// Convert a database row into a domain entity.
pub(super) fn row_to_entity(row: LegalEntityRow) -> Result<LegalEntity, LegalEntityRepositoryError> {
    let LegalEntityRow {
        id,
        name,
        created_by_name,
        created_by_id,
        meta,
        created_at,
        updated_at,
        deleted_at,
    } = row;
    let name = LegalEntityName::new(name).map_err(|err| {
        LegalEntityRepositoryError::query(format!("stored legal entity {id} is invalid: {err}"))
    })?;
    let meta = LegalEntityMeta::try_from(meta).map_err(|err| {
        LegalEntityRepositoryError::query(format!("stored legal entity {id} is invalid: {err}"))
    })?;
    let created_by = CreatorRef {
        name: created_by_name,
        id: created_by_id,
    };
    let state = deleted_at.map_or(LegalEntityState::Active, |at| LegalEntityState::Deleted {
        at,
    });

    Ok(LegalEntity::from_parts(LegalEntityParts {
        id: LegalEntityId::from_uuid(id),
        name,
        created_by: (!created_by.is_empty()).then_some(created_by),
        meta,
        created_at,
        updated_at,
        state,
    }))
}

#[async_trait]
impl LegalEntityRepository for DieselLegalEntityRepository {
    async fn list_active(&self) -> Result<Vec<LegalEntity>, LegalEntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LegalEntityRow> = legal_entities::table
            .filter(legal_entities::deleted_at.is_null())
            .order((legal_entities::created_at.asc(), legal_entities::id.asc()))
            .select(LegalEntityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_entity).collect()
    }

    async fn find_active(
        &self,
        id: &LegalEntityId,
    ) -> Result<Option<LegalEntity>, LegalEntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LegalEntityRow> = legal_entities::table
            .filter(legal_entities::id.eq(id.as_uuid()))
            .filter(legal_entities::deleted_at.is_null())
            .select(LegalEntityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_entity).transpose()
    }

    async fn insert(&self, entity: &LegalEntity) -> Result<(), LegalEntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let creator = entity.created_by();
        let row = NewLegalEntityRow {
            id: *entity.id().as_uuid(),
            name: entity.name().as_ref(),
            created_by_name: creator.and_then(|c| c.name.as_deref()),
            created_by_id: creator.and_then(|c| c.id),
            meta: Value::from(entity.meta().clone()),
            created_at: entity.created_at(),
            updated_at: entity.updated_at(),
        };

        diesel::insert_into(legal_entities::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, entity: &LegalEntity) -> Result<bool, LegalEntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = LegalEntityUpdate {
            name: entity.name().as_ref(),
            meta: Value::from(entity.meta().clone()),
            updated_at: entity.updated_at(),
        };

        let updated = diesel::update(
            legal_entities::table
                .filter(legal_entities::id.eq(entity.id().as_uuid()))
                .filter(legal_entities::deleted_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn soft_delete(
        &self,
        id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<bool, LegalEntityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::update(
            legal_entities::table
                .filter(legal_entities::id.eq(id.as_uuid()))
                .filter(legal_entities::deleted_at.is_null()),
        )
        .set((
            legal_entities::deleted_at.eq(Some(at)),
            legal_entities::updated_at.eq(at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row() -> LegalEntityRow {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .expect("valid timestamp");
        LegalEntityRow {
            id: Uuid::new_v4(),
            name: "Acme LLC".to_owned(),
            created_by_name: None,
            created_by_id: None,
            meta: json!({"inn": "7701234567"}),
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[rstest]
    fn active_row_converts_without_creator() {
        let entity = row_to_entity(row()).expect("valid row");
        assert!(entity.state().is_active());
        assert!(entity.created_by().is_none());
        assert_eq!(entity.meta().as_map().get("inn"), Some(&json!("7701234567")));
    }

    #[rstest]
    fn creator_columns_rebuild_reference() {
        let creator_id = Uuid::new_v4();
        let entity = row_to_entity(LegalEntityRow {
            created_by_id: Some(creator_id),
            ..row()
        })
        .expect("valid row");
        assert_eq!(
            entity.created_by(),
            Some(&CreatorRef {
                name: None,
                id: Some(creator_id),
            })
        );
    }

    #[rstest]
    fn deleted_row_keeps_deletion_time() {
        let base = row();
        let at = base.created_at;
        let entity = row_to_entity(LegalEntityRow {
            deleted_at: Some(at),
            ..base
        })
        .expect("valid row");
        assert_eq!(entity.state().deleted_at(), Some(at));
    }

    #[rstest]
    fn corrupt_meta_is_a_query_error() {
        let err = row_to_entity(LegalEntityRow {
            meta: json!([1, 2]),
            ..row()
        })
        .expect_err("array meta");
        assert!(matches!(err, LegalEntityRepositoryError::Query { .. }));
    }
}
