//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered legal entities.
    ///
    /// Rows are never removed; `deleted_at` marks soft deletion and every
    /// read filters on `deleted_at IS NULL`.
    legal_entities (id) {
        id -> Uuid,
        /// Display name, 1..=100 characters.
        name -> Varchar,
        created_by_name -> Nullable<Text>,
        created_by_id -> Nullable<Uuid>,
        /// Free-form metadata; always a JSON object.
        meta -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Bank accounts owned by legal entities.
    ///
    /// A partial unique index on `legal_entity_id WHERE is_primary` keeps at
    /// most one primary account per entity.
    bank_accounts (id) {
        id -> Uuid,
        legal_entity_id -> Uuid,
        /// Nine-digit bank identification code.
        bic -> Varchar,
        bank_name -> Varchar,
        bank_address -> Nullable<Text>,
        /// Twenty-digit settlement account number.
        settlement_account -> Varchar,
        correspondent_account -> Nullable<Varchar>,
        /// ISO 4217 alphabetic code.
        currency -> Varchar,
        comment -> Nullable<Text>,
        is_primary -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(bank_accounts -> legal_entities (legal_entity_id));
diesel::allow_tables_to_appear_in_same_query!(bank_accounts, legal_entities);
