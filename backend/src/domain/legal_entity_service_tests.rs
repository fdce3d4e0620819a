//! Tests for the legal entity service.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    LegalEntityRepositoryError, MockBankAccountRepository, MockLegalEntityRepository,
};
use crate::domain::service_test_support::{
    active_entity, expecting_notifier, fixture_clock, fixture_timestamp, silent_notifier,
    stored_account,
};

fn service(
    legal_entities: MockLegalEntityRepository,
    bank_accounts: MockBankAccountRepository,
    notifier: Notifier,
) -> LegalEntityService<MockLegalEntityRepository, MockBankAccountRepository> {
    LegalEntityService::new(
        Arc::new(legal_entities),
        Arc::new(bank_accounts),
        notifier,
        fixture_clock(),
    )
}

fn create_request(name: &str) -> CreateLegalEntityRequest {
    CreateLegalEntityRequest {
        name: name.to_owned(),
        created_by: None,
        meta: None,
    }
}

#[tokio::test]
async fn create_persists_stamps_and_notifies() {
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_insert()
        .withf(|entity| {
            entity.name().as_ref() == "Acme LLC"
                && entity.created_at() == fixture_timestamp()
                && entity.state().is_active()
                && entity.meta().as_map().is_empty()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let entity = service(
        legal_entities,
        MockBankAccountRepository::new(),
        expecting_notifier(),
    )
    .create(create_request("Acme LLC"))
    .await
    .expect("entity created");

    assert_eq!(entity.updated_at(), fixture_timestamp());
}

#[rstest]
#[case::one_char(1, true)]
#[case::max_len(100, true)]
#[case::too_long(101, false)]
#[case::empty(0, false)]
#[tokio::test]
async fn create_enforces_name_length(#[case] length: usize, #[case] accepted: bool) {
    let name = "ж".repeat(length);
    let mut legal_entities = MockLegalEntityRepository::new();
    let notifier = if accepted {
        legal_entities
            .expect_insert()
            .times(1)
            .return_once(|_| Ok(()));
        expecting_notifier()
    } else {
        legal_entities.expect_insert().never();
        silent_notifier()
    };

    let result = service(legal_entities, MockBankAccountRepository::new(), notifier)
        .create(create_request(&name))
        .await;

    match result {
        Ok(_) => assert!(accepted),
        Err(err) => {
            assert!(!accepted);
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }
}

#[tokio::test]
async fn create_rejects_non_object_meta() {
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities.expect_insert().never();

    let err = service(legal_entities, MockBankAccountRepository::new(), silent_notifier())
        .create(CreateLegalEntityRequest {
            meta: Some(json!(["not", "an", "object"])),
            ..create_request("Acme LLC")
        })
        .await
        .expect_err("array meta rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({"field": "meta", "code": "meta_not_object"}))
    );
}

#[tokio::test]
async fn create_storage_failure_skips_notification() {
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_insert()
        .times(1)
        .return_once(|_| Err(LegalEntityRepositoryError::connection("pool timed out")));

    let err = service(legal_entities, MockBankAccountRepository::new(), silent_notifier())
        .create(create_request("Acme LLC"))
        .await
        .expect_err("storage failure surfaces");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn update_renames_and_keeps_meta_when_absent() {
    let existing = active_entity("Acme LLC");
    let id = existing.id();
    let original_meta = existing.meta().clone();

    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_find_active()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    legal_entities
        .expect_update()
        .withf(|entity| entity.name().as_ref() == "Acme Holdings")
        .times(1)
        .return_once(|_| Ok(true));

    let updated = service(legal_entities, MockBankAccountRepository::new(), silent_notifier())
        .update(UpdateLegalEntityRequest {
            id,
            name: "Acme Holdings".to_owned(),
            meta: None,
        })
        .await
        .expect("entity updated");

    assert_eq!(updated.meta(), &original_meta);
    assert_eq!(updated.updated_at(), fixture_timestamp());
    assert!(updated.created_at() < updated.updated_at());
}

#[tokio::test]
async fn update_unknown_entity_is_not_found() {
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_find_active()
        .times(1)
        .return_once(|_| Ok(None));
    legal_entities.expect_update().never();

    let err = service(legal_entities, MockBankAccountRepository::new(), silent_notifier())
        .update(UpdateLegalEntityRequest {
            id: LegalEntityId::random(),
            name: "Acme".to_owned(),
            meta: None,
        })
        .await
        .expect_err("unknown entity");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::deleted(true, None)]
#[case::missing(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_entities(
    #[case] matched: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let id = LegalEntityId::random();
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_soft_delete()
        .withf(move |candidate, at| *candidate == id && *at == fixture_timestamp())
        .times(1)
        .return_once(move |_, _| Ok(matched));

    let result = service(legal_entities, MockBankAccountRepository::new(), silent_notifier())
        .delete(id)
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[tokio::test]
async fn list_groups_accounts_by_owner_in_entity_order() {
    let first = active_entity("Acme LLC");
    let second = active_entity("Globex");
    let third = active_entity("Initech");
    let first_account = stored_account(first.id(), true);
    let second_account = stored_account(second.id(), false);
    let expected_ids = vec![first.id(), second.id(), third.id()];

    let mut legal_entities = MockLegalEntityRepository::new();
    let entities = vec![first.clone(), second.clone(), third.clone()];
    legal_entities
        .expect_list_active()
        .times(1)
        .return_once(move || Ok(entities));
    let mut bank_accounts = MockBankAccountRepository::new();
    let accounts = vec![second_account.clone(), first_account.clone()];
    bank_accounts
        .expect_list_by_legal_entities()
        .withf(move |ids| ids == expected_ids.as_slice())
        .times(1)
        .return_once(move |_| Ok(accounts));

    let listed = service(legal_entities, bank_accounts, silent_notifier())
        .list()
        .await
        .expect("list succeeds");

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].entity, first);
    assert_eq!(listed[0].bank_accounts, vec![first_account]);
    assert_eq!(listed[1].bank_accounts, vec![second_account]);
    assert!(listed[2].bank_accounts.is_empty());
}

#[tokio::test]
async fn list_without_entities_skips_account_lookup() {
    let mut legal_entities = MockLegalEntityRepository::new();
    legal_entities
        .expect_list_active()
        .times(1)
        .return_once(|| Ok(Vec::new()));
    let mut bank_accounts = MockBankAccountRepository::new();
    bank_accounts.expect_list_by_legal_entities().never();

    let listed = service(legal_entities, bank_accounts, silent_notifier())
        .list()
        .await
        .expect("list succeeds");

    assert!(listed.is_empty());
}

#[tokio::test]
async fn get_returns_entity_with_accounts() {
    let entity = active_entity("Acme LLC");
    let id = entity.id();
    let account = stored_account(id, true);

    let mut legal_entities = MockLegalEntityRepository::new();
    let found = entity.clone();
    legal_entities
        .expect_find_active()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    let mut bank_accounts = MockBankAccountRepository::new();
    let accounts = vec![account.clone()];
    bank_accounts
        .expect_list_by_legal_entity()
        .withf(move |owner| *owner == id)
        .times(1)
        .return_once(move |_| Ok(accounts));

    let loaded = service(legal_entities, bank_accounts, silent_notifier())
        .get(id)
        .await
        .expect("entity found");

    assert_eq!(loaded.entity, entity);
    assert_eq!(loaded.bank_accounts, vec![account]);
}
