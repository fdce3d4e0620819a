//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`EventPublisher`]) describe what the domain
//! needs from storage and messaging; driving ports (`*Command`, `*Query`)
//! are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod bank_account_command;
mod bank_account_query;
mod bank_account_repository;
mod event_publisher;
mod legal_entity_command;
mod legal_entity_query;
mod legal_entity_repository;

#[cfg(test)]
pub use bank_account_command::MockBankAccountCommand;
pub use bank_account_command::{
    BankAccountCommand, CreateBankAccountRequest, UpdateBankAccountRequest,
};
#[cfg(test)]
pub use bank_account_query::MockBankAccountQuery;
pub use bank_account_query::BankAccountQuery;
#[cfg(test)]
pub use bank_account_repository::MockBankAccountRepository;
pub use bank_account_repository::{
    BankAccountRepository, BankAccountRepositoryError, PrimaryFlagPolicy,
};
#[cfg(test)]
pub use event_publisher::MockEventPublisher;
pub use event_publisher::{EventPublisher, EventPublisherError};
#[cfg(test)]
pub use legal_entity_command::MockLegalEntityCommand;
pub use legal_entity_command::{
    CreateLegalEntityRequest, LegalEntityCommand, UpdateLegalEntityRequest,
};
#[cfg(test)]
pub use legal_entity_query::MockLegalEntityQuery;
pub use legal_entity_query::LegalEntityQuery;
#[cfg(test)]
pub use legal_entity_repository::MockLegalEntityRepository;
pub use legal_entity_repository::{LegalEntityRepository, LegalEntityRepositoryError};
