//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bank_accounts, legal_entities};

/// Row struct for reading from the legal_entities table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = legal_entities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LegalEntityRow {
    pub id: Uuid,
    pub name: String,
    pub created_by_name: Option<String>,
    pub created_by_id: Option<Uuid>,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct for registering a legal entity.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = legal_entities)]
pub(crate) struct NewLegalEntityRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_by_name: Option<&'a str>,
    pub created_by_id: Option<Uuid>,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for renaming a legal entity or replacing its metadata.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = legal_entities)]
pub(crate) struct LegalEntityUpdate<'a> {
    pub name: &'a str,
    pub meta: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the bank_accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bank_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BankAccountRow {
    pub id: Uuid,
    pub legal_entity_id: Uuid,
    pub bic: String,
    pub bank_name: String,
    pub bank_address: Option<String>,
    pub settlement_account: String,
    pub correspondent_account: Option<String>,
    pub currency: String,
    pub comment: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating bank account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bank_accounts)]
pub(crate) struct NewBankAccountRow<'a> {
    pub id: Uuid,
    pub legal_entity_id: Uuid,
    pub bic: &'a str,
    pub bank_name: &'a str,
    pub bank_address: Option<&'a str>,
    pub settlement_account: &'a str,
    pub correspondent_account: Option<&'a str>,
    pub currency: &'a str,
    pub comment: Option<&'a str>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-replace changeset for bank account records.
///
/// `treat_none_as_null` makes clearing an optional field write `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bank_accounts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BankAccountUpdate<'a> {
    pub legal_entity_id: Uuid,
    pub bic: &'a str,
    pub bank_name: &'a str,
    pub bank_address: Option<&'a str>,
    pub settlement_account: &'a str,
    pub correspondent_account: Option<&'a str>,
    pub currency: &'a str,
    pub comment: Option<&'a str>,
    pub is_primary: bool,
    pub updated_at: DateTime<Utc>,
}
