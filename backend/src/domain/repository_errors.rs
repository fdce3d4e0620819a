//! Translation of repository failures into domain errors.
//!
//! Every mapping prefixes the operation being performed so logs and
//! non-internal responses name the record involved.

use serde_json::json;
use tracing::debug;

use super::Error;
use super::ports::{BankAccountRepositoryError, LegalEntityRepositoryError};
use super::{BankAccountId, BankAccountValidationError, LegalEntityId, LegalEntityValidationError};

pub(crate) fn map_legal_entity_error(error: LegalEntityRepositoryError, operation: &str) -> Error {
    debug!(%error, operation, "legal entity repository call failed");
    match error {
        LegalEntityRepositoryError::Connection { message } => Error::service_unavailable(format!(
            "{operation}: legal entity repository unavailable: {message}"
        )),
        LegalEntityRepositoryError::Query { message } => Error::internal(format!(
            "{operation}: legal entity repository error: {message}"
        )),
    }
}

pub(crate) fn map_bank_account_error(error: BankAccountRepositoryError, operation: &str) -> Error {
    debug!(%error, operation, "bank account repository call failed");
    match error {
        BankAccountRepositoryError::Connection { message } => Error::service_unavailable(format!(
            "{operation}: bank account repository unavailable: {message}"
        )),
        BankAccountRepositoryError::LegalEntityMissing { legal_entity_id } => {
            legal_entity_not_found(LegalEntityId::from_uuid(legal_entity_id))
        }
        BankAccountRepositoryError::DuplicateId { id } => {
            Error::conflict(format!("{operation}: bank account {id} already exists"))
                .with_details(json!({ "id": id, "code": "duplicate_id" }))
        }
        BankAccountRepositoryError::PrimaryConflict { legal_entity_id } => Error::conflict(format!(
            "{operation}: legal entity {legal_entity_id} already has a primary bank account"
        ))
        .with_details(json!({ "legalEntityId": legal_entity_id, "code": "primary_conflict" })),
        other @ (BankAccountRepositoryError::Query { .. }
        | BankAccountRepositoryError::ClearPrimary { .. }) => {
            Error::internal(format!("{operation}: {other}"))
        }
    }
}

pub(crate) fn legal_entity_not_found(id: LegalEntityId) -> Error {
    Error::not_found(format!("legal entity {id} not found"))
        .with_details(json!({ "legalEntityId": id.as_uuid() }))
}

pub(crate) fn bank_account_not_found(id: BankAccountId) -> Error {
    Error::not_found(format!("bank account {id} not found"))
        .with_details(json!({ "bankAccountId": id.as_uuid() }))
}

pub(crate) fn invalid_bank_account(error: BankAccountValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

impl From<BankAccountValidationError> for Error {
    fn from(error: BankAccountValidationError) -> Self {
        invalid_bank_account(error)
    }
}

pub(crate) fn invalid_legal_entity(error: LegalEntityValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}
