//! Tests for domain error construction and cause recording.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[derive(Debug)]
struct Outer(std::io::Error);

impl fmt::Display for Outer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("outer failure")
    }
}

impl std::error::Error for Outer {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[should_panic(expected = "error messages must satisfy validation")]
fn new_panics_on_blank_message() {
    let _ = Error::new(ErrorCode::NotFound, "");
}

#[rstest]
fn details_are_attached(base_error: Error) {
    let err = base_error.with_details(json!({"field": "name"}));
    assert_eq!(err.details(), Some(&json!({"field": "name"})));
}

#[rstest]
fn with_source_walks_the_whole_chain(base_error: Error) {
    let source = Outer(std::io::Error::other("socket closed"));
    let err = base_error.with_source(&source);
    assert_eq!(err.causes(), ["outer failure", "socket closed"]);
}

#[rstest]
fn causes_accumulate_in_order(base_error: Error) {
    let err = base_error.with_cause("first").with_cause("second");
    assert_eq!(err.causes(), ["first", "second"]);
    assert_eq!(err.to_string(), "bad");
}

#[rstest]
fn codes_render_as_snake_case() {
    assert_eq!(ErrorCode::InvalidRequest.to_string(), "invalid_request");
    assert_eq!(ErrorCode::NotFound.as_str(), "not_found");
    assert_eq!(
        serde_json::to_value(ErrorCode::InternalError).expect("serialise code"),
        json!("internal_error")
    );
}
