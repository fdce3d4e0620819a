//! Driving port for legal entity mutations.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CreatorRef, Error, LegalEntity, LegalEntityId};

/// Input for registering a legal entity.
///
/// `meta` must be a JSON object when present; absent metadata becomes `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLegalEntityRequest {
    pub name: String,
    pub created_by: Option<CreatorRef>,
    pub meta: Option<Value>,
}

/// Input for renaming a legal entity, optionally replacing its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLegalEntityRequest {
    pub id: LegalEntityId,
    pub name: String,
    pub meta: Option<Value>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegalEntityCommand: Send + Sync {
    /// Register a legal entity and announce it.
    async fn create(&self, request: CreateLegalEntityRequest) -> Result<LegalEntity, Error>;

    /// Rename an active legal entity.
    async fn update(&self, request: UpdateLegalEntityRequest) -> Result<LegalEntity, Error>;

    /// Soft-delete an active legal entity.
    async fn delete(&self, id: LegalEntityId) -> Result<(), Error>;
}
