//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use super::bank_accounts::{
    create_bank_account, delete_bank_account, get_bank_account, list_bank_accounts,
    update_bank_account,
};
use super::legal_entities::{
    create_legal_entity, delete_legal_entity, get_legal_entity, list_legal_entities,
    update_legal_entity,
};
use super::state::HttpState;
use super::validation::json_config;
use crate::domain::{BankAccountService, LegalEntityService, Notifier};
use crate::outbound::events::LoggingEventPublisher;
use crate::outbound::memory::InMemoryStore;

/// Handler state backed by the in-memory store and a log-only publisher.
pub fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Notifier::new(Arc::new(LoggingEventPublisher));
    let legal_entities = Arc::new(LegalEntityService::new(
        store.clone(),
        store.clone(),
        notifier.clone(),
        Arc::new(mockable::DefaultClock),
    ));
    let bank_accounts = Arc::new(BankAccountService::new(
        store.clone(),
        store,
        notifier,
        Arc::new(mockable::DefaultClock),
    ));
    HttpState::new(
        legal_entities.clone(),
        legal_entities,
        bank_accounts.clone(),
        bank_accounts,
    )
}

/// App exposing every resource route under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(list_legal_entities)
                .service(create_legal_entity)
                .service(get_legal_entity)
                .service(update_legal_entity)
                .service(delete_legal_entity)
                .service(list_bank_accounts)
                .service(create_bank_account)
                .service(get_bank_account)
                .service(update_bank_account)
                .service(delete_bank_account),
        )
}
