//! Turns domain errors into JSON responses for the legal entity and bank
//! account handlers.
//!
//! Storage failures are logged with the request's trace id before the
//! response leaves; query failures reach the client only as a generic
//! message. Client mistakes (bad payloads, unknown ids) stay at debug level.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{Level, debug, error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log level for a failed request.
///
/// A primary-flag conflict means the storage backstop fired, which the
/// auto-clear path should prevent, so it is logged like an outage.
fn log_level_for(code: ErrorCode) -> Level {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::NotFound => Level::DEBUG,
        ErrorCode::Conflict | ErrorCode::ServiceUnavailable => Level::WARN,
        ErrorCode::InternalError => Level::ERROR,
    }
}

fn log_failure(failure: &Error) {
    let code = failure.code();
    let trace_id = failure.trace_id();
    let detail = failure.message();
    match log_level_for(code) {
        Level::ERROR => error!(?code, trace_id, detail, "request failed"),
        Level::WARN => warn!(?code, trace_id, detail, "request failed"),
        _ => debug!(?code, trace_id, detail, "request rejected"),
    }
}

/// Body sent to the client: internal failures keep only their trace id.
fn client_body(failure: &Error) -> Error {
    if failure.code() != ErrorCode::InternalError {
        return failure.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match failure.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_failure(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}
