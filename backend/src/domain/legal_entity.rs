//! Legal entity aggregate.
//!
//! A legal entity is the organisation that owns bank accounts. Entities are
//! never physically removed; deletion moves them into
//! [`LegalEntityState::Deleted`] and every read path filters them out.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::bank_account::BankAccount;

/// Maximum legal entity name length, counted in Unicode scalar values.
pub const LEGAL_ENTITY_NAME_MAX: usize = 100;

/// Stable legal entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalEntityId(Uuid);

impl LegalEntityId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for LegalEntityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for LegalEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors for legal entity input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegalEntityValidationError {
    #[error("legal entity name must not be empty")]
    EmptyName,
    #[error("legal entity name must be at most {max} characters (got {actual})")]
    NameTooLong { max: usize, actual: usize },
    #[error("legal entity metadata must be a JSON object")]
    MetaNotObject,
}

impl LegalEntityValidationError {
    /// Request field the failure refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::MetaNotObject => "meta",
        }
    }

    /// Stable machine-readable failure code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::MetaNotObject => "meta_not_object",
        }
    }
}

/// Validated legal entity name (1 to 100 characters).
///
/// # Examples
/// ```
/// use legal_entities::domain::LegalEntityName;
///
/// let name = LegalEntityName::new("Acme LLC").expect("valid name");
/// assert_eq!(name.as_ref(), "Acme LLC");
/// assert!(LegalEntityName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LegalEntityName(String);

impl LegalEntityName {
    pub fn new(name: impl Into<String>) -> Result<Self, LegalEntityValidationError> {
        let name = name.into();
        let length = name.chars().count();
        if length == 0 {
            return Err(LegalEntityValidationError::EmptyName);
        }
        if length > LEGAL_ENTITY_NAME_MAX {
            return Err(LegalEntityValidationError::NameTooLong {
                max: LEGAL_ENTITY_NAME_MAX,
                actual: length,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for LegalEntityName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LegalEntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LegalEntityName {
    type Error = LegalEntityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LegalEntityName> for String {
    fn from(value: LegalEntityName) -> Self {
        value.0
    }
}

/// Optional reference to whoever registered the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRef {
    pub name: Option<String>,
    pub id: Option<Uuid>,
}

impl CreatorRef {
    /// Whether neither the name nor the id is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.id.is_none()
    }
}

/// Free-form legal entity metadata; always a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct LegalEntityMeta(Map<String, Value>);

impl LegalEntityMeta {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for LegalEntityMeta {
    type Error = LegalEntityValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(LegalEntityValidationError::MetaNotObject),
        }
    }
}

impl From<Map<String, Value>> for LegalEntityMeta {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<LegalEntityMeta> for Value {
    fn from(value: LegalEntityMeta) -> Self {
        Value::Object(value.0)
    }
}

/// Lifecycle state of a legal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LegalEntityState {
    Active,
    Deleted { at: DateTime<Utc> },
}

impl LegalEntityState {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Deletion timestamp, when deleted.
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(*at),
        }
    }
}

/// Input for registering a new legal entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalEntityDraft {
    pub name: LegalEntityName,
    pub created_by: Option<CreatorRef>,
    pub meta: LegalEntityMeta,
}

/// Legal entity aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    id: LegalEntityId,
    name: LegalEntityName,
    created_by: Option<CreatorRef>,
    meta: LegalEntityMeta,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    state: LegalEntityState,
}

impl LegalEntity {
    /// Register a new active entity stamped with `now`.
    pub fn register(id: LegalEntityId, draft: LegalEntityDraft, now: DateTime<Utc>) -> Self {
        let LegalEntityDraft {
            name,
            created_by,
            meta,
        } = draft;
        Self {
            id,
            name,
            created_by: created_by.filter(|creator| !creator.is_empty()),
            meta,
            created_at: now,
            updated_at: now,
            state: LegalEntityState::Active,
        }
    }

    /// Rebuild an entity from stored fields.
    pub fn from_parts(parts: LegalEntityParts) -> Self {
        let LegalEntityParts {
            id,
            name,
            created_by,
            meta,
            created_at,
            updated_at,
            state,
        } = parts;
        Self {
            id,
            name,
            created_by,
            meta,
            created_at,
            updated_at,
            state,
        }
    }

    pub fn id(&self) -> LegalEntityId {
        self.id
    }

    pub fn name(&self) -> &LegalEntityName {
        &self.name
    }

    pub fn created_by(&self) -> Option<&CreatorRef> {
        self.created_by.as_ref()
    }

    pub fn meta(&self) -> &LegalEntityMeta {
        &self.meta
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn state(&self) -> LegalEntityState {
        self.state
    }

    /// Replace the name and bump the update timestamp.
    pub fn rename(&mut self, name: LegalEntityName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    /// Replace the metadata and bump the update timestamp.
    pub fn replace_meta(&mut self, meta: LegalEntityMeta, now: DateTime<Utc>) {
        self.meta = meta;
        self.updated_at = now;
    }
}

/// Stored legal entity fields, used by persistence adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalEntityParts {
    pub id: LegalEntityId,
    pub name: LegalEntityName,
    pub created_by: Option<CreatorRef>,
    pub meta: LegalEntityMeta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: LegalEntityState,
}

/// Read model pairing an entity with the accounts it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalEntityWithAccounts {
    pub entity: LegalEntity,
    pub bank_accounts: Vec<BankAccount>,
}
