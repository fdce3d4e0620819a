//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types; neither leaves this module. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! ```ignore
//! use legal_entities::outbound::persistence::{DbPool, DieselLegalEntityRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/legal_entities")).await?;
//! let repo = DieselLegalEntityRepository::new(pool);
//! ```

mod diesel_bank_account_repository;
mod diesel_basic_error_mapping;
mod diesel_legal_entity_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bank_account_repository::DieselBankAccountRepository;
pub use diesel_legal_entity_repository::DieselLegalEntityRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
