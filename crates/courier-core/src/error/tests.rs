//! Unit tests for the route error taxonomy.

use rstest::rstest;

use super::*;

#[rstest]
#[case::bad_request(RouteError::bad_request("x"), 400)]
#[case::unauthorized(RouteError::unauthorized("x"), 401)]
#[case::access_denied(RouteError::access_denied("x"), 403)]
#[case::not_found(RouteError::not_found("x"), 404)]
#[case::method_not_allowed(RouteError::method_not_allowed("x", ["GET"]), 405)]
#[case::too_many_requests(RouteError::too_many_requests("x"), 429)]
#[case::encoder(RouteError::encoder_failure("x"), 500)]
#[case::handler(RouteError::handler_failure("x"), 500)]
#[case::internal(RouteError::internal("x"), 500)]
#[case::coded(RouteError::coded(-32001, "x"), 500)]
#[case::unavailable(RouteError::unavailable("x"), 503)]
fn maps_kind_to_status(#[case] error: RouteError, #[case] expected: u16) {
    assert_eq!(error.status_code(), expected);
}

#[test]
fn display_is_the_bare_message() {
    let error = RouteError::handler_failure("no handler matched the request");
    assert_eq!(error.to_string(), "no handler matched the request");
}

#[rstest]
#[case::coded(RouteError::coded(-32050, "boom"), -32050)]
#[case::positive(RouteError::coded(123, "boom"), 123)]
#[case::uncoded(RouteError::access_denied("nope"), 0)]
fn exposes_application_code(#[case] error: RouteError, #[case] expected: i64) {
    assert_eq!(error.code(), expected);
}

#[test]
fn method_not_allowed_carries_allowed_verbs() {
    let error = RouteError::method_not_allowed("use POST", ["POST", "OPTIONS"]);
    let allowed = error.allowed_methods().expect("allowed verbs");
    assert_eq!(allowed, ["POST".to_owned(), "OPTIONS".to_owned()]);
    assert!(RouteError::internal("x").allowed_methods().is_none());
}

#[test]
fn encoder_failure_keeps_serde_source() {
    let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
    let error = RouteError::from_json_error(source);
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.to_string().starts_with("failed to encode response"));
}
