//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("login"), ErrorCode::Unauthorized)]
#[case::forbidden(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("taken"), ErrorCode::Conflict)]
#[case::bad_gateway(Error::bad_gateway("garbled"), ErrorCode::BadGateway)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn blank_message_falls_back_to_code_message() {
    let error = Error::conflict("   ");
    assert_eq!(error.message(), "conflict");
}

#[rstest]
fn try_new_rejects_blank_message() {
    let result = Error::try_new(ErrorCode::NotFound, "");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn serialises_with_snake_case_code_and_camel_case_fields() {
    let error = Error::bad_gateway("unexpected model output")
        .with_trace_id("abc")
        .with_details(json!({ "field": "confidence" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "bad_gateway",
            "message": "unexpected model output",
            "traceId": "abc",
            "details": { "field": "confidence" }
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let expected = trace_id.to_string();
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected.as_str()));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}
