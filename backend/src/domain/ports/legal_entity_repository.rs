//! Port for legal entity persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{LegalEntity, LegalEntityId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by legal entity repository adapters.
    pub enum LegalEntityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "legal entity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "legal entity repository query failed: {message}",
    }
}

/// Storage operations for legal entities.
///
/// Every read excludes soft-deleted entities. `update` and `soft_delete`
/// report whether an active row matched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegalEntityRepository: Send + Sync {
    /// All active entities ordered by creation time.
    async fn list_active(&self) -> Result<Vec<LegalEntity>, LegalEntityRepositoryError>;

    /// Look up an active entity.
    async fn find_active(
        &self,
        id: &LegalEntityId,
    ) -> Result<Option<LegalEntity>, LegalEntityRepositoryError>;

    /// Persist a newly registered entity.
    async fn insert(&self, entity: &LegalEntity) -> Result<(), LegalEntityRepositoryError>;

    /// Replace name, metadata and update time of an active entity.
    async fn update(&self, entity: &LegalEntity) -> Result<bool, LegalEntityRepositoryError>;

    /// Mark an active entity deleted at `at`.
    async fn soft_delete(
        &self,
        id: &LegalEntityId,
        at: DateTime<Utc>,
    ) -> Result<bool, LegalEntityRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_formats_message() {
        let err = LegalEntityRepositoryError::connection("pool exhausted");
        assert_eq!(
            err.to_string(),
            "legal entity repository connection failed: pool exhausted"
        );
    }
}
