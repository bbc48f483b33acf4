//! HTTP adapter mapping for domain errors.
//!
//! The domain error stays HTTP-agnostic; this module turns it into the JSON
//! envelope and status code. Internal errors are redacted before they leave
//! the process, keeping only the trace id. Extractor failures (bad JSON,
//! query strings or path segments) are folded into the same envelope so
//! clients only ever parse one error shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, IMAGE_MAX_BYTES, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Largest accepted JSON body: a maximal image after base64 expansion plus
/// room for the surrounding fields.
pub const JSON_BODY_LIMIT: usize = IMAGE_MAX_BYTES / 3 * 4 + 64 * 1024;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn json_payload_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::OverflowKnownLength { limit, .. }
        | JsonPayloadError::Overflow { limit } => {
            Error::invalid_request("request body too large")
                .with_details(json!({ "code": "body_too_large", "limit": limit }))
        }
        JsonPayloadError::ContentType => Error::invalid_request("expected application/json body")
            .with_details(json!({ "code": "unsupported_content_type" })),
        JsonPayloadError::Deserialize(source) => {
            Error::invalid_request(format!("malformed JSON body: {source}"))
                .with_details(json!({ "code": "malformed_body" }))
        }
        other => Error::invalid_request(format!("unreadable request body: {other}")),
    }
}

fn reject_extractor(error: Error, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), message = error.message(), "rejected request input");
    error.into()
}

/// JSON extractor settings for every API route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| reject_extractor(json_payload_error(&err), req))
}

/// Query-string extractor settings for every API route.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req| {
        reject_extractor(
            Error::invalid_request(format!("invalid query string: {err}"))
                .with_details(json!({ "code": "malformed_query" })),
            req,
        )
    })
}

/// Path extractor settings for every API route.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req| {
        reject_extractor(
            Error::invalid_request(format!("invalid path segment: {err}"))
                .with_details(json!({ "code": "malformed_path" })),
            req,
        )
    })
}
