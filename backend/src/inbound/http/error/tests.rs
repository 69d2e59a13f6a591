//! Tests for HTTP error mapping and the error envelope.

use super::*;
use crate::domain::{ANIME_NOT_FOUND, Error, INVALID_NAME};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::Value;

fn render(uri: &str, failure: &Failure) -> HttpResponse {
    let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
    render_failure(path, query, failure)
}

async fn json_body(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

#[fixture]
fn storage_failure() -> Error {
    Error::internal("anime store failure").with_cause("anime store connection failed: refused")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[actix_web::test]
async fn domain_error_response_has_no_body() {
    let response = ResponseError::error_response(&Error::not_found(ANIME_NOT_FOUND));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    assert!(bytes.is_empty());
}

#[rstest]
#[case("trace=true", true)]
#[case("page=2&trace=true", true)]
#[case("trace=true&trace=true", true)]
#[case("trace=false&trace=true", true)]
#[case("trace=%74rue", true)]
#[case("trace=false", false)]
#[case("trace=TRUE", false)]
#[case("trace", false)]
#[case("", false)]
fn trace_flag_is_literal(#[case] query: &str, #[case] expected: bool) {
    assert_eq!(trace_requested(query), expected);
}

#[actix_web::test]
async fn not_found_renders_status_exception_envelope() {
    let failure = Failure::from_domain(&Error::not_found(ANIME_NOT_FOUND));
    let response = render("/records/42", &failure);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

    let body = json_body(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], ANIME_NOT_FOUND);
    assert_eq!(body["developerMessage"], STATUS_EXCEPTION);
    assert_eq!(body["path"], "/records/42");
    assert!(body.get("timestamp").and_then(Value::as_str).is_some());
    assert!(body.get("stackTrace").is_none());
}

#[actix_web::test]
async fn trace_flag_adds_stack_trace_without_changing_summary() {
    let failure = Failure::from_domain(&Error::invalid_request(INVALID_NAME));
    let plain = json_body(render("/records", &failure)).await;
    let traced = json_body(render("/records?trace=true", &failure)).await;

    for field in ["status", "message", "developerMessage", "path"] {
        assert_eq!(plain[field], traced[field], "{field} must not change");
    }
    let stack = traced["stackTrace"].as_array().expect("stack trace array");
    assert_eq!(stack, &vec![Value::from("invalid_request: Invalid Name")]);
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted_but_traceable(storage_failure: Error) {
    let failure = Failure::from_domain(&storage_failure);
    let body = json_body(render("/records?trace=true", &failure)).await;

    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["developerMessage"], "An unexpected error occurred");
    assert_eq!(
        body["stackTrace"],
        serde_json::json!([
            "internal_error: anime store failure",
            "caused by: anime store connection failed: refused"
        ])
    );
}

#[actix_web::test]
async fn unauthorized_carries_basic_challenge() {
    let failure = Failure::from_domain(&Error::unauthorized("Authentication required"));
    let response = render("/records", &failure);

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some(BASIC_CHALLENGE)
    );
    let body = json_body(response).await;
    assert_eq!(
        body["developerMessage"],
        "Authentication is required to access this resource"
    );
}

#[actix_web::test]
async fn forbidden_has_no_challenge() {
    let failure = Failure::from_domain(&Error::forbidden("Access denied"));
    let response = render("/records", &failure);

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}

#[rstest]
#[case(StatusCode::BAD_REQUEST, "Json deserialize error", StatusCode::BAD_REQUEST, "Json deserialize error")]
#[case(StatusCode::PAYLOAD_TOO_LARGE, "payload too large", StatusCode::PAYLOAD_TOO_LARGE, "payload too large")]
#[case(StatusCode::BAD_GATEWAY, "upstream exploded", StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
fn untyped_failures_keep_client_status_only(
    #[case] raised: StatusCode,
    #[case] detail: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let failure = Failure::from_untyped(raised, detail);
    assert_eq!(failure.status(), status);
    assert_eq!(failure.message(), message);
    assert_eq!(failure.trace().len(), 1);
}

#[test]
fn actix_errors_wrapping_domain_errors_stay_typed() {
    let wrapped: actix_web::Error = Error::not_found(ANIME_NOT_FOUND).into();
    let failure = Failure::from_actix(&wrapped);
    assert_eq!(failure.status(), StatusCode::NOT_FOUND);
    assert_eq!(failure.message(), ANIME_NOT_FOUND);
}

#[test]
fn plain_actix_errors_are_untyped() {
    let wrapped = actix_web::error::ErrorUnprocessableEntity("bad shape");
    let failure = Failure::from_actix(&wrapped);
    assert_eq!(failure.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(failure.message(), "bad shape");
}

#[given("a batch rejected for an invalid name")]
fn a_rejected_batch() -> Failure {
    Failure::from_domain(&Error::invalid_request(INVALID_NAME))
}

#[when("the failure is rendered without the trace flag")]
fn rendered_without_trace(failure: Failure) -> ErrorBody {
    error_body("/records/batch", "", &failure)
}

#[then("the envelope omits the stack trace")]
fn envelope_omits_stack_trace(body: ErrorBody) {
    assert_eq!(body.status, 400);
    assert_eq!(body.message, INVALID_NAME);
    assert!(body.stack_trace.is_none());
    let json = serde_json::to_value(&body).expect("serialise");
    assert!(json.get("stackTrace").is_none());
}

#[rstest]
fn rejected_batch_envelope_scenario() {
    let failure = a_rejected_batch();
    let body = rendered_without_trace(failure);
    envelope_omits_stack_trace(body);
}
