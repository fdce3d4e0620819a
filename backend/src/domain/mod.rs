//! Domain primitives, aggregates and services.
//!
//! Purpose: model legal entities and their bank accounts, and keep the
//! primary-account rule (at most one primary account per entity) in one
//! place. Adapters talk to the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - LegalEntity and BankAccount aggregates with their validation errors.
//! - LegalEntityService and BankAccountService implementing the driving
//!   ports.

pub mod bank_account;
pub mod bank_account_service;
pub mod error;
pub mod events;
pub mod legal_entity;
pub mod legal_entity_service;
pub mod notifier;
pub mod ports;
mod repository_errors;
#[cfg(test)]
pub(crate) mod service_test_support;
pub mod trace_id;

pub use self::bank_account::{
    BANK_NAME_MAX, BankAccount, BankAccountDraft, BankAccountId, BankAccountValidationError,
    DEFAULT_CURRENCY, validate_bank_account,
};
pub use self::bank_account_service::BankAccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{CreatedMessage, CreationEvent, EventKind};
pub use self::legal_entity::{
    CreatorRef, LEGAL_ENTITY_NAME_MAX, LegalEntity, LegalEntityDraft, LegalEntityId,
    LegalEntityMeta, LegalEntityName, LegalEntityParts, LegalEntityState,
    LegalEntityValidationError, LegalEntityWithAccounts,
};
pub use self::legal_entity_service::LegalEntityService;
pub use self::notifier::{DEFAULT_NOTIFICATION_TIMEOUT, Notifier};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
