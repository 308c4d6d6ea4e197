//! Response envelope test helpers
//!
//! Asserts the `{ok, status, message, ...}` contract without depending on
//! backend types, so the assertions break if the wire shape drifts.

use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Local mirror of the backend's error envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelopeLike {
    pub ok: bool,
    pub status: String,
    pub message: String,
    pub code: String,
    pub trace_id: String,
    #[serde(default)]
    pub errors: Vec<FieldErrorLike>,
}

#[derive(Debug, Deserialize)]
pub struct FieldErrorLike {
    pub field: String,
    pub message: String,
}

/// Assert that a ServiceResponse is a failure envelope and return it parsed.
///
/// Validates:
/// - HTTP status matches expected
/// - `ok == false` and `status == "failed"`
/// - x-trace-id header exists and matches body trace_id
/// - `code` matches expected
pub async fn assert_error_envelope(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorEnvelopeLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_eq!(status, expected_status);

    let body_str = String::from_utf8(body.to_vec()).expect("Response body should be valid UTF-8");
    let envelope: ErrorEnvelopeLike =
        serde_json::from_str(&body_str).expect("Response body should be an error envelope");

    assert!(!envelope.ok, "error envelope must carry ok=false");
    assert_eq!(envelope.status, "failed");
    assert_eq!(envelope.code, expected_code);

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        envelope.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );

    envelope
}

/// Assert that a JSON body is a success envelope and return it.
pub fn assert_success_envelope(body: &Value) {
    assert_eq!(body["ok"], Value::Bool(true), "body: {body}");
    assert_eq!(body["status"], "success", "body: {body}");
    assert!(body["message"].is_string(), "message must be present: {body}");
}

/// Recursively assert that no object in `value` carries a `password` key.
pub fn assert_no_password_anywhere(value: &Value) {
    match value {
        Value::Object(map) => {
            assert!(
                !map.contains_key("password"),
                "password field leaked in response: {value}"
            );
            map.values().for_each(assert_no_password_anywhere);
        }
        Value::Array(items) => items.iter().for_each(assert_no_password_anywhere),
        _ => {}
    }
}
