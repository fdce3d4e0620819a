//! Legal entity and bank account registry.
//!
//! The library keeps at most one primary bank account per legal entity and
//! exposes the domain, its adapters and the OpenAPI document. The binary in
//! `main.rs` wires them into an Actix server.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
