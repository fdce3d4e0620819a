//! Builders selecting storage and event adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use legal_entities::domain::ports::{
    BankAccountRepository, EventPublisher, LegalEntityRepository,
};
use legal_entities::domain::{BankAccountService, LegalEntityService, Notifier};
use legal_entities::inbound::http::state::HttpState;
use legal_entities::outbound::events::{HttpEventPublisher, LoggingEventPublisher};
use legal_entities::outbound::memory::InMemoryStore;
use legal_entities::outbound::persistence::{
    DieselBankAccountRepository, DieselLegalEntityRepository,
};

use super::ServerConfig;

/// Wire both services over one pair of repositories.
fn build_services<L, B>(
    legal_entities: Arc<L>,
    bank_accounts: Arc<B>,
    notifier: Notifier,
) -> HttpState
where
    L: LegalEntityRepository + 'static,
    B: BankAccountRepository + 'static,
{
    let entity_service = Arc::new(LegalEntityService::new(
        legal_entities.clone(),
        bank_accounts.clone(),
        notifier.clone(),
        Arc::new(DefaultClock),
    ));
    let account_service = Arc::new(BankAccountService::new(
        legal_entities,
        bank_accounts,
        notifier,
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        entity_service.clone(),
        entity_service,
        account_service.clone(),
        account_service,
    )
}

/// Select the Kafka REST publisher when an endpoint is configured, otherwise
/// log events locally.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be built.
fn build_publisher(config: &ServerConfig) -> std::io::Result<Arc<dyn EventPublisher>> {
    match &config.events_endpoint {
        Some(endpoint) => {
            let publisher = HttpEventPublisher::new(
                endpoint,
                &config.event_topics,
                config.notification_timeout,
            )
            .map_err(|e| std::io::Error::other(format!("event publisher setup failed: {e}")))?;
            info!(endpoint = %endpoint, "publishing events to Kafka REST proxy");
            Ok(Arc::new(publisher))
        }
        None => {
            info!("no events endpoint configured; events are logged only");
            Ok(Arc::new(LoggingEventPublisher))
        }
    }
}

/// Build the shared HTTP state: Diesel repositories when a pool is present,
/// the in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let notifier =
        Notifier::new(build_publisher(config)?).with_timeout(config.notification_timeout);
    let state = match &config.db_pool {
        Some(pool) => build_services(
            Arc::new(DieselLegalEntityRepository::new(pool.clone())),
            Arc::new(DieselBankAccountRepository::new(pool.clone())),
            notifier,
        ),
        None => {
            info!("no database configured; using in-memory storage");
            let store = Arc::new(InMemoryStore::new());
            build_services(store.clone(), store, notifier)
        }
    };
    Ok(web::Data::new(state))
}
