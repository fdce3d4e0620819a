//! Legal entity HTTP handlers.
//!
//! ```text
//! GET    /api/v1/legal-entities
//! POST   /api/v1/legal-entities
//! GET    /api/v1/legal-entities/{id}
//! PUT    /api/v1/legal-entities/{id}
//! DELETE /api/v1/legal-entities/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{CreateLegalEntityRequest, UpdateLegalEntityRequest};
use crate::domain::{CreatorRef, Error, LegalEntity, LegalEntityId, LegalEntityWithAccounts};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bank_accounts::BankAccountResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_uuid, parse_uuid,
};

#[derive(Debug, Deserialize)]
struct LegalEntityPath {
    id: String,
}

/// Who registered the entity. Both parts are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPayload {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// Request payload for registering a legal entity.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLegalEntityPayload {
    #[schema(example = "Acme LLC")]
    pub name: Option<String>,
    pub created_by: Option<CreatorPayload>,
    /// Free-form JSON object; `{}` when omitted.
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

/// Request payload for renaming a legal entity.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLegalEntityPayload {
    #[schema(example = "Acme Holdings LLC")]
    pub name: Option<String>,
    /// Replaces the stored metadata when present.
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

/// Response payload for a legal entity.
///
/// `bankAccounts` is present on reads and omitted from write responses.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatorPayload>,
    #[schema(value_type = Object)]
    pub meta: Value,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_accounts: Option<Vec<BankAccountResponse>>,
}

impl From<&CreatorRef> for CreatorPayload {
    fn from(value: &CreatorRef) -> Self {
        Self {
            name: value.name.clone(),
            id: value.id.map(|id| id.to_string()),
        }
    }
}

impl From<LegalEntity> for LegalEntityResponse {
    fn from(value: LegalEntity) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            created_by: value.created_by().map(CreatorPayload::from),
            meta: Value::from(value.meta().clone()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
            bank_accounts: None,
        }
    }
}

impl From<LegalEntityWithAccounts> for LegalEntityResponse {
    fn from(value: LegalEntityWithAccounts) -> Self {
        let LegalEntityWithAccounts {
            entity,
            bank_accounts,
        } = value;
        Self {
            bank_accounts: Some(
                bank_accounts
                    .into_iter()
                    .map(BankAccountResponse::from)
                    .collect(),
            ),
            ..Self::from(entity)
        }
    }
}

const NAME: FieldName = FieldName::new("name");

fn parse_creator(payload: Option<CreatorPayload>) -> Result<Option<CreatorRef>, Error> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let creator = CreatorRef {
        name: payload.name.filter(|name| !name.is_empty()),
        id: parse_optional_uuid(payload.id, FieldName::new("createdBy.id"))?,
    };
    Ok((!creator.is_empty()).then_some(creator))
}

fn parse_create_payload(payload: CreateLegalEntityPayload) -> Result<CreateLegalEntityRequest, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    Ok(CreateLegalEntityRequest {
        name,
        created_by: parse_creator(payload.created_by)?,
        meta: payload.meta,
    })
}

fn parse_legal_entity_path(path: LegalEntityPath) -> Result<LegalEntityId, Error> {
    parse_uuid(path.id, FieldName::new("id")).map(LegalEntityId::from_uuid)
}

/// List every active legal entity with its bank accounts.
#[utoipa::path(
    get,
    path = "/api/v1/legal-entities",
    responses(
        (status = 200, description = "Legal entities", body = [LegalEntityResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["legal-entities"],
    operation_id = "listLegalEntities"
)]
#[get("/legal-entities")]
pub async fn list_legal_entities(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LegalEntityResponse>>> {
    let entities = state.legal_entities_query.list().await?;
    Ok(web::Json(
        entities.into_iter().map(LegalEntityResponse::from).collect(),
    ))
}

/// Register a legal entity.
#[utoipa::path(
    post,
    path = "/api/v1/legal-entities",
    request_body = CreateLegalEntityPayload,
    responses(
        (status = 201, description = "Legal entity created", body = LegalEntityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["legal-entities"],
    operation_id = "createLegalEntity"
)]
#[post("/legal-entities")]
pub async fn create_legal_entity(
    state: web::Data<HttpState>,
    payload: web::Json<CreateLegalEntityPayload>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_payload(payload.into_inner())?;
    let entity = state.legal_entities.create(request).await?;
    Ok(HttpResponse::Created().json(LegalEntityResponse::from(entity)))
}

/// Fetch one active legal entity with its bank accounts.
#[utoipa::path(
    get,
    path = "/api/v1/legal-entities/{id}",
    params(("id" = String, Path, description = "Legal entity identifier")),
    responses(
        (status = 200, description = "Legal entity", body = LegalEntityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["legal-entities"],
    operation_id = "getLegalEntity"
)]
#[get("/legal-entities/{id}")]
pub async fn get_legal_entity(
    state: web::Data<HttpState>,
    path: web::Path<LegalEntityPath>,
) -> ApiResult<web::Json<LegalEntityResponse>> {
    let id = parse_legal_entity_path(path.into_inner())?;
    let entity = state.legal_entities_query.get(id).await?;
    Ok(web::Json(LegalEntityResponse::from(entity)))
}

/// Rename a legal entity, optionally replacing its metadata.
#[utoipa::path(
    put,
    path = "/api/v1/legal-entities/{id}",
    params(("id" = String, Path, description = "Legal entity identifier")),
    request_body = UpdateLegalEntityPayload,
    responses(
        (status = 200, description = "Updated legal entity", body = LegalEntityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["legal-entities"],
    operation_id = "updateLegalEntity"
)]
#[put("/legal-entities/{id}")]
pub async fn update_legal_entity(
    state: web::Data<HttpState>,
    path: web::Path<LegalEntityPath>,
    payload: web::Json<UpdateLegalEntityPayload>,
) -> ApiResult<web::Json<LegalEntityResponse>> {
    let id = parse_legal_entity_path(path.into_inner())?;
    let payload = payload.into_inner();
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let entity = state
        .legal_entities
        .update(UpdateLegalEntityRequest {
            id,
            name,
            meta: payload.meta,
        })
        .await?;
    Ok(web::Json(LegalEntityResponse::from(entity)))
}

/// Soft-delete a legal entity.
#[utoipa::path(
    delete,
    path = "/api/v1/legal-entities/{id}",
    params(("id" = String, Path, description = "Legal entity identifier")),
    responses(
        (status = 204, description = "Legal entity deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["legal-entities"],
    operation_id = "deleteLegalEntity"
)]
#[delete("/legal-entities/{id}")]
pub async fn delete_legal_entity(
    state: web::Data<HttpState>,
    path: web::Path<LegalEntityPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_legal_entity_path(path.into_inner())?;
    state.legal_entities.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "legal_entities_tests.rs"]
mod tests;
