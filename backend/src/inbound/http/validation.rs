//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is a `400 invalid_request` whose details name the field,
//! a stable code, and (where useful) the offending value.

use pagination::PaginationError;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, GeoValidationError, ReportValidationError, UserValidationError, WasteValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidValue,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const LOCATION: FieldName = FieldName::new("location");
pub(crate) const WASTE_TYPE: FieldName = FieldName::new("type");
pub(crate) const AMOUNT: FieldName = FieldName::new("amount");
pub(crate) const IMAGE: FieldName = FieldName::new("image");
pub(crate) const VERIFICATION_STATUS: FieldName = FieldName::new("verificationStatus");
pub(crate) const PAGE: FieldName = FieldName::new("page");
pub(crate) const PER_PAGE: FieldName = FieldName::new("perPage");
pub(crate) const LIMIT: FieldName = FieldName::new("limit");
pub(crate) const QUERY: FieldName = FieldName::new("q");
pub(crate) const LATITUDE: FieldName = FieldName::new("lat");
pub(crate) const LONGITUDE: FieldName = FieldName::new("lng");

pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn user_error(field: FieldName, err: &UserValidationError) -> Error {
    field_error(field, ErrorCode::InvalidValue, err.to_string())
}

pub(crate) fn waste_error(field: FieldName, err: &WasteValidationError) -> Error {
    let code = match err {
        WasteValidationError::ImageTooLarge { .. }
        | WasteValidationError::ConfidenceOutOfRange { .. } => ErrorCode::OutOfRange,
        _ => ErrorCode::InvalidValue,
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn report_error(field: FieldName, err: &ReportValidationError) -> Error {
    field_error(field, ErrorCode::InvalidValue, err.to_string())
}

pub(crate) fn geo_error(err: &GeoValidationError) -> Error {
    let field = match err {
        GeoValidationError::LatitudeOutOfRange { .. } => LATITUDE,
        GeoValidationError::LongitudeOutOfRange { .. } => LONGITUDE,
        GeoValidationError::EmptyQuery => QUERY,
    };
    let code = match err {
        GeoValidationError::EmptyQuery => ErrorCode::InvalidValue,
        _ => ErrorCode::OutOfRange,
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn pagination_error(err: PaginationError) -> Error {
    let field = match err {
        PaginationError::PageOutOfRange => PAGE,
        PaginationError::PerPageOutOfRange { .. } => PER_PAGE,
    };
    field_error(field, ErrorCode::OutOfRange, err.to_string())
}
