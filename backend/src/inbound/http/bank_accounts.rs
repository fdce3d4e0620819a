//! Bank account HTTP handlers, scoped under their owning legal entity.
//!
//! ```text
//! GET    /api/v1/legal-entities/{id}/bank-accounts
//! POST   /api/v1/legal-entities/{id}/bank-accounts
//! GET    /api/v1/legal-entities/{id}/bank-accounts/{account_id}
//! PUT    /api/v1/legal-entities/{id}/bank-accounts/{account_id}
//! DELETE /api/v1/legal-entities/{id}/bank-accounts/{account_id}
//! ```
//!
//! An account addressed through an entity it does not belong to is reported
//! as missing.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{CreateBankAccountRequest, UpdateBankAccountRequest};
use crate::domain::{
    BankAccount, BankAccountDraft, BankAccountId, Error, LegalEntityId, validate_bank_account,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_uuid, parse_uuid,
};

const LEGAL_ENTITY_ID: FieldName = FieldName::new("legalEntityId");
const ACCOUNT_ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize)]
struct LegalEntityPath {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BankAccountPath {
    id: String,
    account_id: String,
}

/// Request payload for creating or replacing a bank account.
///
/// On create, `legalEntityId` may be omitted; when present it must name the
/// entity in the path. On update, it moves the account to that entity.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountRequest {
    /// Caller-chosen identifier; generated when omitted on create.
    pub id: Option<String>,
    pub legal_entity_id: Option<String>,
    #[schema(example = "044525974")]
    pub bic: Option<String>,
    #[schema(example = "Tinkoff Bank")]
    pub bank_name: Option<String>,
    pub bank_address: Option<String>,
    #[schema(example = "40702810716540010359")]
    pub settlement_account: Option<String>,
    pub correspondent_account: Option<String>,
    /// ISO 4217 code; `RUB` when omitted.
    pub currency: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Response payload for a bank account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountResponse {
    pub id: String,
    pub legal_entity_id: String,
    pub bic: String,
    pub bank_name: String,
    pub bank_address: Option<String>,
    pub settlement_account: String,
    pub correspondent_account: Option<String>,
    pub currency: String,
    pub comment: Option<String>,
    pub is_primary: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BankAccount> for BankAccountResponse {
    fn from(value: BankAccount) -> Self {
        Self {
            id: value.id.to_string(),
            legal_entity_id: value.legal_entity_id.to_string(),
            bic: value.bic,
            bank_name: value.bank_name,
            bank_address: value.bank_address,
            settlement_account: value.settlement_account,
            correspondent_account: value.correspondent_account,
            currency: value.currency,
            comment: value.comment,
            is_primary: value.is_primary,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

struct ParsedBankAccount {
    id: Option<BankAccountId>,
    owner: Option<LegalEntityId>,
    fields: BankAccountFields,
}

struct BankAccountFields {
    bic: String,
    bank_name: String,
    bank_address: Option<String>,
    settlement_account: String,
    correspondent_account: Option<String>,
    currency: Option<String>,
    comment: Option<String>,
    is_primary: bool,
}

impl BankAccountFields {
    fn into_draft(self, legal_entity_id: LegalEntityId) -> BankAccountDraft {
        BankAccountDraft {
            legal_entity_id,
            bic: self.bic,
            bank_name: self.bank_name,
            bank_address: self.bank_address,
            settlement_account: self.settlement_account,
            correspondent_account: self.correspondent_account,
            currency: self.currency,
            comment: self.comment,
            is_primary: self.is_primary,
        }
    }
}

fn parse_bank_account_request(payload: BankAccountRequest) -> Result<ParsedBankAccount, Error> {
    let bic = payload
        .bic
        .ok_or_else(|| missing_field_error(FieldName::new("bic")))?;
    let bank_name = payload
        .bank_name
        .ok_or_else(|| missing_field_error(FieldName::new("bankName")))?;
    let settlement_account = payload
        .settlement_account
        .ok_or_else(|| missing_field_error(FieldName::new("settlementAccount")))?;

    Ok(ParsedBankAccount {
        id: parse_optional_uuid(payload.id, ACCOUNT_ID)?.map(BankAccountId::from_uuid),
        owner: parse_optional_uuid(payload.legal_entity_id, LEGAL_ENTITY_ID)?
            .map(LegalEntityId::from_uuid),
        fields: BankAccountFields {
            bic,
            bank_name,
            bank_address: payload.bank_address,
            settlement_account,
            correspondent_account: payload.correspondent_account,
            currency: payload.currency,
            comment: payload.comment,
            is_primary: payload.is_primary,
        },
    })
}

fn parse_legal_entity_path(path: LegalEntityPath) -> Result<LegalEntityId, Error> {
    parse_uuid(path.id, FieldName::new("id")).map(LegalEntityId::from_uuid)
}

fn parse_bank_account_path(
    path: BankAccountPath,
) -> Result<(LegalEntityId, BankAccountId), Error> {
    let legal_entity_id = parse_uuid(path.id, FieldName::new("id"))?;
    let account_id = parse_uuid(path.account_id, FieldName::new("accountId"))?;
    Ok((
        LegalEntityId::from_uuid(legal_entity_id),
        BankAccountId::from_uuid(account_id),
    ))
}

fn owner_mismatch_error(path_owner: LegalEntityId, body_owner: LegalEntityId) -> Error {
    Error::invalid_request("legalEntityId must match the legal entity in the path").with_details(
        json!({
            "field": "legalEntityId",
            "value": body_owner.to_string(),
            "expected": path_owner.to_string(),
            "code": "legal_entity_mismatch",
        }),
    )
}

fn account_id_mismatch_error(path_id: BankAccountId, body_id: BankAccountId) -> Error {
    Error::invalid_request("id must match the bank account in the path").with_details(json!({
        "field": "id",
        "value": body_id.to_string(),
        "expected": path_id.to_string(),
        "code": "bank_account_mismatch",
    }))
}

fn account_not_found(id: BankAccountId) -> Error {
    Error::not_found(format!("bank account {id} not found"))
        .with_details(json!({ "bankAccountId": id.to_string() }))
}

/// Fetch an account, treating one owned by another entity as missing.
async fn load_owned(
    state: &HttpState,
    owner: LegalEntityId,
    id: BankAccountId,
) -> Result<BankAccount, Error> {
    let account = state.bank_accounts_query.get(id).await?;
    if account.legal_entity_id == owner {
        Ok(account)
    } else {
        Err(account_not_found(id))
    }
}

/// List the bank accounts of a legal entity.
#[utoipa::path(
    get,
    path = "/api/v1/legal-entities/{id}/bank-accounts",
    params(("id" = String, Path, description = "Legal entity identifier")),
    responses(
        (status = 200, description = "Bank accounts", body = [BankAccountResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Legal entity not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bank-accounts"],
    operation_id = "listBankAccounts"
)]
#[get("/legal-entities/{id}/bank-accounts")]
pub async fn list_bank_accounts(
    state: web::Data<HttpState>,
    path: web::Path<LegalEntityPath>,
) -> ApiResult<web::Json<Vec<BankAccountResponse>>> {
    let owner = parse_legal_entity_path(path.into_inner())?;
    let accounts = state.bank_accounts_query.list_for_legal_entity(owner).await?;
    Ok(web::Json(
        accounts.into_iter().map(BankAccountResponse::from).collect(),
    ))
}

/// Create a bank account for a legal entity.
///
/// A primary account takes the flag from every other account of the entity.
#[utoipa::path(
    post,
    path = "/api/v1/legal-entities/{id}/bank-accounts",
    params(("id" = String, Path, description = "Legal entity identifier")),
    request_body = BankAccountRequest,
    responses(
        (status = 201, description = "Bank account created", body = BankAccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Legal entity not found", body = ErrorSchema),
        (status = 409, description = "Conflict", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bank-accounts"],
    operation_id = "createBankAccount"
)]
#[post("/legal-entities/{id}/bank-accounts")]
pub async fn create_bank_account(
    state: web::Data<HttpState>,
    path: web::Path<LegalEntityPath>,
    payload: web::Json<BankAccountRequest>,
) -> ApiResult<HttpResponse> {
    let owner = parse_legal_entity_path(path.into_inner())?;
    let parsed = parse_bank_account_request(payload.into_inner())?;
    if let Some(body_owner) = parsed.owner.filter(|body_owner| *body_owner != owner) {
        return Err(owner_mismatch_error(owner, body_owner));
    }

    let account = state
        .bank_accounts
        .create(CreateBankAccountRequest {
            id: parsed.id,
            account: parsed.fields.into_draft(owner),
        })
        .await?;

    Ok(HttpResponse::Created().json(BankAccountResponse::from(account)))
}

/// Fetch one bank account of a legal entity.
#[utoipa::path(
    get,
    path = "/api/v1/legal-entities/{id}/bank-accounts/{account_id}",
    params(
        ("id" = String, Path, description = "Legal entity identifier"),
        ("account_id" = String, Path, description = "Bank account identifier")
    ),
    responses(
        (status = 200, description = "Bank account", body = BankAccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Bank account not found", body = ErrorSchema)
    ),
    tags = ["bank-accounts"],
    operation_id = "getBankAccount"
)]
#[get("/legal-entities/{id}/bank-accounts/{account_id}")]
pub async fn get_bank_account(
    state: web::Data<HttpState>,
    path: web::Path<BankAccountPath>,
) -> ApiResult<web::Json<BankAccountResponse>> {
    let (owner, id) = parse_bank_account_path(path.into_inner())?;
    let account = load_owned(&state, owner, id).await?;
    Ok(web::Json(BankAccountResponse::from(account)))
}

/// Replace a bank account.
///
/// `legalEntityId` in the body moves the account to another entity; without
/// it the account stays with the entity in the path.
#[utoipa::path(
    put,
    path = "/api/v1/legal-entities/{id}/bank-accounts/{account_id}",
    params(
        ("id" = String, Path, description = "Legal entity identifier"),
        ("account_id" = String, Path, description = "Bank account identifier")
    ),
    request_body = BankAccountRequest,
    responses(
        (status = 200, description = "Updated bank account", body = BankAccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Bank account or legal entity not found", body = ErrorSchema),
        (status = 409, description = "Conflict", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bank-accounts"],
    operation_id = "updateBankAccount"
)]
#[put("/legal-entities/{id}/bank-accounts/{account_id}")]
pub async fn update_bank_account(
    state: web::Data<HttpState>,
    path: web::Path<BankAccountPath>,
    payload: web::Json<BankAccountRequest>,
) -> ApiResult<web::Json<BankAccountResponse>> {
    let (owner, id) = parse_bank_account_path(path.into_inner())?;
    let parsed = parse_bank_account_request(payload.into_inner())?;
    if let Some(body_id) = parsed.id.filter(|body_id| *body_id != id) {
        return Err(account_id_mismatch_error(id, body_id));
    }
    let draft = parsed.fields.into_draft(parsed.owner.unwrap_or(owner));
    validate_bank_account(&draft)?;
    load_owned(&state, owner, id).await?;

    let account = state
        .bank_accounts
        .update(UpdateBankAccountRequest { id, account: draft })
        .await?;

    Ok(web::Json(BankAccountResponse::from(account)))
}

/// Delete a bank account.
#[utoipa::path(
    delete,
    path = "/api/v1/legal-entities/{id}/bank-accounts/{account_id}",
    params(
        ("id" = String, Path, description = "Legal entity identifier"),
        ("account_id" = String, Path, description = "Bank account identifier")
    ),
    responses(
        (status = 204, description = "Bank account deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Bank account not found", body = ErrorSchema)
    ),
    tags = ["bank-accounts"],
    operation_id = "deleteBankAccount"
)]
#[delete("/legal-entities/{id}/bank-accounts/{account_id}")]
pub async fn delete_bank_account(
    state: web::Data<HttpState>,
    path: web::Path<BankAccountPath>,
) -> ApiResult<HttpResponse> {
    let (owner, id) = parse_bank_account_path(path.into_inner())?;
    load_owned(&state, owner, id).await?;
    state.bank_accounts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "bank_accounts_tests.rs"]
mod tests;
