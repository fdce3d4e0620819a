//! Tests for bank account HTTP handlers.

use super::*;
use crate::inbound::http::legal_entities::LegalEntityResponse;
use crate::inbound::http::test_utils::{memory_state, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

trait TestService:
    actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >
{
}

impl<S> TestService for S where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >
{
}

async fn create_entity(app: &impl TestService, name: &str) -> String {
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities")
        .set_json(json!({ "name": name }))
        .to_request();
    let created: LegalEntityResponse = actix_test::call_and_read_body_json(app, req).await;
    created.id
}

fn account_body(bic: &str, bank: &str, settlement: &str, is_primary: bool) -> Value {
    json!({
        "bic": bic,
        "bankName": bank,
        "settlementAccount": settlement,
        "isPrimary": is_primary,
    })
}

fn first_account() -> Value {
    account_body("044525974", "Tinkoff Bank", "40702810716540010359", true)
}

fn second_account() -> Value {
    account_body("044525225", "Other Bank", "30101810400000000225", true)
}

async fn post_account(app: &impl TestService, entity: &str, body: Value) -> BankAccountResponse {
    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/legal-entities/{entity}/bank-accounts"))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

async fn list_accounts(app: &impl TestService, entity: &str) -> Vec<BankAccountResponse> {
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/legal-entities/{entity}/bank-accounts"))
        .to_request();
    actix_test::call_and_read_body_json(app, req).await
}

fn primary_ids(accounts: &[BankAccountResponse]) -> Vec<&str> {
    accounts
        .iter()
        .filter(|account| account.is_primary)
        .map(|account| account.id.as_str())
        .collect()
}

#[actix_web::test]
async fn second_primary_account_takes_the_flag() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;

    let first = post_account(&app, &entity, first_account()).await;
    assert!(first.is_primary);
    assert_eq!(first.currency, "RUB");
    let second = post_account(&app, &entity, second_account()).await;

    let accounts = list_accounts(&app, &entity).await;
    assert_eq!(accounts.len(), 2);
    assert_eq!(primary_ids(&accounts), vec![second.id.as_str()]);
}

#[actix_web::test]
async fn promoting_an_account_demotes_the_previous_primary() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let first = post_account(&app, &entity, first_account()).await;
    let second = post_account(
        &app,
        &entity,
        account_body("044525225", "Other Bank", "30101810400000000225", false),
    )
    .await;

    let req = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/legal-entities/{entity}/bank-accounts/{}",
            second.id
        ))
        .set_json(second_account())
        .to_request();
    let updated: BankAccountResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert!(updated.is_primary);
    assert_eq!(updated.created_at, second.created_at);
    let accounts = list_accounts(&app, &entity).await;
    assert_eq!(primary_ids(&accounts), vec![second.id.as_str()]);
    assert!(accounts.iter().any(|account| account.id == first.id && !account.is_primary));
}

#[actix_web::test]
async fn entity_reads_nest_accounts() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    post_account(&app, &entity, first_account()).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/legal-entities/{entity}"))
        .to_request();
    let fetched: LegalEntityResponse = actix_test::call_and_read_body_json(&app, req).await;

    let accounts = fetched.bank_accounts.expect("accounts nested");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].legal_entity_id, entity);
}

#[rstest]
#[case::short_bic(account_body("04452597", "Bank", "40702810716540010359", false), "invalid_bic")]
#[case::letters_in_settlement(
    account_body("044525974", "Bank", "4070281071654001035X", false),
    "invalid_settlement_account"
)]
#[case::empty_bank_name(account_body("044525974", "", "40702810716540010359", false), "empty_bank_name")]
#[case::missing_bic(json!({"bankName": "Bank", "settlementAccount": "40702810716540010359"}), "missing_field")]
#[case::lowercase_currency(
    json!({
        "bic": "044525974",
        "bankName": "Bank",
        "settlementAccount": "40702810716540010359",
        "currency": "rub"
    }),
    "invalid_currency"
)]
#[actix_web::test]
async fn invalid_accounts_are_rejected(#[case] body: Value, #[case] code: &str) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/legal-entities/{entity}/bank-accounts"))
        .set_json(body)
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], code);
    assert!(list_accounts(&app, &entity).await.is_empty());
}

#[actix_web::test]
async fn create_for_unknown_entity_is_not_found() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities/3fa85f64-5717-4562-b3fc-2c963f66afa6/bank-accounts")
        .set_json(first_account())
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_rejects_body_owner_that_differs_from_path() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let other = create_entity(&app, "Other LLC").await;
    let mut body = first_account();
    body["legalEntityId"] = json!(other);

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/legal-entities/{entity}/bank-accounts"))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "legal_entity_mismatch");
}

#[actix_web::test]
async fn account_of_another_entity_is_not_found() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let owner = create_entity(&app, "Acme LLC").await;
    let stranger = create_entity(&app, "Other LLC").await;
    let account = post_account(&app, &owner, first_account()).await;
    let uri = format!(
        "/api/v1/legal-entities/{stranger}/bank-accounts/{}",
        account.id
    );

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(list_accounts(&app, &owner).await.len(), 1);
}

#[actix_web::test]
async fn update_moves_account_to_body_owner() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let source = create_entity(&app, "Acme LLC").await;
    let target = create_entity(&app, "Other LLC").await;
    let target_primary = post_account(&app, &target, second_account()).await;
    let moved = post_account(&app, &source, first_account()).await;
    let mut body = first_account();
    body["legalEntityId"] = json!(target);

    let req = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/legal-entities/{source}/bank-accounts/{}",
            moved.id
        ))
        .set_json(body)
        .to_request();
    let updated: BankAccountResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.legal_entity_id, target);
    assert!(list_accounts(&app, &source).await.is_empty());
    let target_accounts = list_accounts(&app, &target).await;
    assert_eq!(primary_ids(&target_accounts), vec![moved.id.as_str()]);
    assert!(
        target_accounts
            .iter()
            .any(|account| account.id == target_primary.id && !account.is_primary)
    );
}

#[actix_web::test]
async fn delete_removes_account() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let account = post_account(&app, &entity, first_account()).await;
    let uri = format!("/api/v1/legal-entities/{entity}/bank-accounts/{}", account.id);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
fn parse_request_keeps_optional_fields() {
    let parsed = parse_bank_account_request(BankAccountRequest {
        id: Some("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned()),
        bic: Some("044525974".to_owned()),
        bank_name: Some("Tinkoff Bank".to_owned()),
        settlement_account: Some("40702810716540010359".to_owned()),
        currency: Some("USD".to_owned()),
        ..BankAccountRequest::default()
    })
    .expect("valid request");

    assert!(parsed.id.is_some());
    assert!(parsed.owner.is_none());
    let draft = parsed.fields.into_draft(LegalEntityId::random());
    assert_eq!(draft.currency(), Some("USD"));
    assert!(!draft.is_primary);
}

#[rstest]
fn parse_request_rejects_bad_owner_uuid() {
    let err = parse_bank_account_request(BankAccountRequest {
        legal_entity_id: Some("acme".to_owned()),
        bic: Some("044525974".to_owned()),
        bank_name: Some("Tinkoff Bank".to_owned()),
        settlement_account: Some("40702810716540010359".to_owned()),
        ..BankAccountRequest::default()
    })
    .err()
    .expect("bad uuid");

    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&json!("legalEntityId"))
    );
}

#[actix_web::test]
async fn update_validates_fields_before_looking_up_the_account() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;

    let req = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/legal-entities/{entity}/bank-accounts/3fa85f64-5717-4562-b3fc-2c963f66afa6"
        ))
        .set_json(account_body("04452597", "Bank", "40702810716540010359", false))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_bic");
}

#[actix_web::test]
async fn update_rejects_body_id_that_differs_from_path() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let account = post_account(&app, &entity, first_account()).await;
    let mut body = first_account();
    body["id"] = json!("3fa85f64-5717-4562-b3fc-2c963f66afa6");
    body["bankName"] = json!("Renamed Bank");

    let req = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/legal-entities/{entity}/bank-accounts/{}",
            account.id
        ))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "bank_account_mismatch");
    let accounts = list_accounts(&app, &entity).await;
    assert_eq!(accounts[0].bank_name, "Tinkoff Bank");
}

#[actix_web::test]
async fn update_accepts_body_id_matching_path() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let entity = create_entity(&app, "Acme LLC").await;
    let account = post_account(&app, &entity, first_account()).await;
    let mut body = first_account();
    body["id"] = json!(account.id);

    let req = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/legal-entities/{entity}/bank-accounts/{}",
            account.id
        ))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}
