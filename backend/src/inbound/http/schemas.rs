//! OpenAPI shapes for the error envelope.
//!
//! [`crate::domain::Error`] stays free of `utoipa` derives; these mirrors
//! document it instead and are registered in [`crate::doc::ApiDoc`].

use utoipa::ToSchema;

/// Machine-readable failure category.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Body, query or path failed validation, or a report did not verify.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session, or the session user no longer exists.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in but acting on a task held by someone else.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// Claimed by another collector, already finished, or balance too low.
    #[schema(rename = "conflict")]
    Conflict,
    /// The model or geocoder answered with something unusable.
    #[schema(rename = "bad_gateway")]
    BadGateway,
    /// The model, geocoder or database could not be reached in time.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Refinement carried in `details` for some failures.
#[derive(ToSchema)]
#[schema(as = ErrorDetails)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorDetailsSchema {
    /// Narrower reason, e.g. `already_claimed`, `insufficient_balance`,
    /// `body_too_large`.
    #[schema(example = "insufficient_balance")]
    code: Option<String>,
    /// Offending request field for validation failures.
    #[schema(example = "limit")]
    field: Option<String>,
    /// Spendable points when a redemption exceeds the balance.
    #[schema(example = 12)]
    available: Option<u64>,
}

/// Body of every non-2xx response.
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable; redacted to a generic phrase for 5xx responses.
    #[schema(example = "task already claimed")]
    message: String,
    /// Same value as the `trace-id` response header.
    #[schema(example = "0b7c2a3e-9f41-4d8e-a5b6-c7d8e9f00112")]
    trace_id: Option<String>,
    details: Option<ErrorDetailsSchema>,
}
