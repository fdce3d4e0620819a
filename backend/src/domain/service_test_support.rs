//! Shared fixtures for the domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::MockEventPublisher;
use crate::domain::{
    BankAccount, BankAccountDraft, BankAccountId, LegalEntity, LegalEntityDraft, LegalEntityId,
    LegalEntityMeta, LegalEntityName, Notifier,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn earlier_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// Notifier whose publisher must never be called.
pub(crate) fn silent_notifier() -> Notifier {
    let mut publisher = MockEventPublisher::new();
    publisher.expect_publish().never();
    Notifier::new(Arc::new(publisher))
}

/// Notifier expecting exactly one publish, which succeeds.
pub(crate) fn expecting_notifier() -> Notifier {
    let mut publisher = MockEventPublisher::new();
    publisher.expect_publish().times(1).return_once(|_| Ok(()));
    Notifier::new(Arc::new(publisher))
}

pub(crate) fn active_entity(name: &str) -> LegalEntity {
    LegalEntity::register(
        LegalEntityId::random(),
        LegalEntityDraft {
            name: LegalEntityName::new(name).expect("valid name"),
            created_by: None,
            meta: LegalEntityMeta::default(),
        },
        earlier_timestamp(),
    )
}

pub(crate) fn account_draft(legal_entity_id: LegalEntityId, is_primary: bool) -> BankAccountDraft {
    BankAccountDraft {
        legal_entity_id,
        bic: "044525974".to_owned(),
        bank_name: "Test Bank".to_owned(),
        bank_address: None,
        settlement_account: "40702810716540010359".to_owned(),
        correspondent_account: None,
        currency: None,
        comment: None,
        is_primary,
    }
}

pub(crate) fn stored_account(legal_entity_id: LegalEntityId, is_primary: bool) -> BankAccount {
    BankAccount::from_validated(
        BankAccountId::random(),
        account_draft(legal_entity_id, is_primary),
        earlier_timestamp(),
        earlier_timestamp(),
    )
}
