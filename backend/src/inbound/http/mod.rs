//! HTTP inbound adapter exposing REST endpoints.

pub mod bank_accounts;
pub mod error;
pub mod health;
pub mod legal_entities;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
pub use validation::json_config;
