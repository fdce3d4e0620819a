//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the schema wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep
//! domain types free of utoipa derives.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::bank_accounts::{BankAccountRequest, BankAccountResponse};
use crate::inbound::http::legal_entities::{
    CreateLegalEntityPayload, CreatorPayload, LegalEntityResponse, UpdateLegalEntityPayload,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Legal entities API",
        description = "Registry of legal entities and their bank accounts. \
            Each legal entity has at most one primary bank account."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::legal_entities::list_legal_entities,
        crate::inbound::http::legal_entities::create_legal_entity,
        crate::inbound::http::legal_entities::get_legal_entity,
        crate::inbound::http::legal_entities::update_legal_entity,
        crate::inbound::http::legal_entities::delete_legal_entity,
        crate::inbound::http::bank_accounts::list_bank_accounts,
        crate::inbound::http::bank_accounts::create_bank_account,
        crate::inbound::http::bank_accounts::get_bank_account,
        crate::inbound::http::bank_accounts::update_bank_account,
        crate::inbound::http::bank_accounts::delete_bank_account,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreatorPayload,
        CreateLegalEntityPayload,
        UpdateLegalEntityPayload,
        LegalEntityResponse,
        BankAccountRequest,
        BankAccountResponse
    )),
    tags(
        (name = "legal-entities", description = "Legal entity registry"),
        (name = "bank-accounts", description = "Bank accounts of a legal entity"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
