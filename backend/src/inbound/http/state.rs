//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BankAccountCommand, BankAccountQuery, LegalEntityCommand, LegalEntityQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub legal_entities: Arc<dyn LegalEntityCommand>,
    pub legal_entities_query: Arc<dyn LegalEntityQuery>,
    pub bank_accounts: Arc<dyn BankAccountCommand>,
    pub bank_accounts_query: Arc<dyn BankAccountQuery>,
}

impl HttpState {
    /// Bundle the driving ports consumed by the handlers.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use legal_entities::domain::{BankAccountService, LegalEntityService, Notifier};
    /// use legal_entities::inbound::http::state::HttpState;
    /// use legal_entities::outbound::events::LoggingEventPublisher;
    /// use legal_entities::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let notifier = Notifier::new(Arc::new(LoggingEventPublisher));
    /// let entities = Arc::new(LegalEntityService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     notifier.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let accounts = Arc::new(BankAccountService::new(
    ///     store.clone(),
    ///     store,
    ///     notifier,
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(entities.clone(), entities, accounts.clone(), accounts);
    /// let _query = state.legal_entities_query.clone();
    /// ```
    pub fn new(
        legal_entities: Arc<dyn LegalEntityCommand>,
        legal_entities_query: Arc<dyn LegalEntityQuery>,
        bank_accounts: Arc<dyn BankAccountCommand>,
        bank_accounts_query: Arc<dyn BankAccountQuery>,
    ) -> Self {
        Self {
            legal_entities,
            legal_entities_query,
            bank_accounts,
            bank_accounts_query,
        }
    }
}
