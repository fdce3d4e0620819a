//! Tests for legal entity HTTP handlers.

use super::*;
use crate::domain::ports::{
    MockBankAccountCommand, MockBankAccountQuery, MockLegalEntityCommand, MockLegalEntityQuery,
};
use crate::inbound::http::test_utils::{memory_state, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

async fn create_entity(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    body: Value,
) -> LegalEntityResponse {
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities")
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

#[actix_web::test]
async fn create_returns_created_entity_with_default_meta() {
    let app = actix_test::init_service(test_app(memory_state())).await;

    let created = create_entity(&app, json!({"name": "Acme LLC"})).await;

    assert_eq!(created.name, "Acme LLC");
    assert_eq!(created.meta, json!({}));
    assert!(created.created_by.is_none());
    assert!(created.bank_accounts.is_none());
    assert_eq!(created.created_at, created.updated_at);
}

#[actix_web::test]
async fn create_keeps_creator_reference() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let creator_id = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    let created = create_entity(
        &app,
        json!({
            "name": "Acme LLC",
            "createdBy": {"name": "Registrar", "id": creator_id},
            "meta": {"inn": "7701234567"}
        }),
    )
    .await;

    let creator = created.created_by.expect("creator kept");
    assert_eq!(creator.name.as_deref(), Some("Registrar"));
    assert_eq!(creator.id.as_deref(), Some(creator_id));
    assert_eq!(created.meta, json!({"inn": "7701234567"}));
}

#[rstest]
#[case::missing_name(json!({}), "missing_field")]
#[case::empty_name(json!({"name": ""}), "empty_name")]
#[case::array_meta(json!({"name": "Acme", "meta": [1]}), "meta_not_object")]
#[case::bad_creator(json!({"name": "Acme", "createdBy": {"id": "x"}}), "invalid_uuid")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(#[case] body: Value, #[case] code: &str) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities")
        .set_json(body)
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\":")
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[actix_web::test]
async fn get_returns_entity_with_empty_account_list() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let created = create_entity(&app, json!({"name": "Acme LLC"})).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/legal-entities/{}", created.id))
        .to_request();
    let fetched: LegalEntityResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.bank_accounts.map(|accounts| accounts.len()), Some(0));
}

#[rstest]
#[case::not_a_uuid("acme", StatusCode::BAD_REQUEST)]
#[case::unknown("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn get_reports_bad_and_unknown_ids(#[case] id: &str, #[case] status: StatusCode) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/legal-entities/{id}"))
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), status);
}

#[actix_web::test]
async fn update_renames_and_keeps_meta_when_omitted() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let created = create_entity(&app, json!({"name": "Acme", "meta": {"k": 1}})).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/legal-entities/{}", created.id))
        .set_json(json!({"name": "Acme Holdings"}))
        .to_request();
    let updated: LegalEntityResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.name, "Acme Holdings");
    assert_eq!(updated.meta, json!({"k": 1}));
    assert_eq!(updated.created_at, created.created_at);
}

#[actix_web::test]
async fn deleted_entity_disappears_from_reads() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let kept = create_entity(&app, json!({"name": "Kept"})).await;
    let gone = create_entity(&app, json!({"name": "Gone"})).await;

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/legal-entities/{}", gone.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/legal-entities/{}", gone.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/legal-entities")
        .to_request();
    let listed: Vec<LegalEntityResponse> = actix_test::call_and_read_body_json(&app, req).await;
    let ids: Vec<_> = listed.into_iter().map(|entity| entity.id).collect();
    assert_eq!(ids, vec![kept.id]);
}

#[actix_web::test]
async fn storage_failures_are_redacted() {
    let mut query = MockLegalEntityQuery::new();
    query
        .expect_list()
        .times(1)
        .return_once(|| Err(Error::internal("listing legal entities: relation missing")));
    let state = HttpState::new(
        Arc::new(MockLegalEntityCommand::new()),
        Arc::new(query),
        Arc::new(MockBankAccountCommand::new()),
        Arc::new(MockBankAccountQuery::new()),
    );
    let app = actix_test::init_service(test_app(state)).await;
    let req = actix_test::TestRequest::get()
        .uri("/api/v1/legal-entities")
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Internal server error");
}

#[actix_web::test]
async fn unavailable_storage_maps_to_503() {
    let mut command = MockLegalEntityCommand::new();
    command
        .expect_create()
        .times(1)
        .return_once(|_| Err(Error::service_unavailable("creating legal entity: pool timed out")));
    let state = HttpState::new(
        Arc::new(command),
        Arc::new(MockLegalEntityQuery::new()),
        Arc::new(MockBankAccountCommand::new()),
        Arc::new(MockBankAccountQuery::new()),
    );
    let app = actix_test::init_service(test_app(state)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/legal-entities")
        .set_json(json!({"name": "Acme"}))
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
