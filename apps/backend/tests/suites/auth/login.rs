// Integration tests for POST /users/login.

use actix_web::http::StatusCode;
use actix_web::test;
use backend::verify_access_token;
use backend::SecurityConfig;
use backend_test_support::envelope::{
    assert_error_envelope, assert_no_password_anywhere, assert_success_envelope,
};
use serde_json::{json, Value};

use crate::common::{ann_signup, ANN_PASSWORD};
use crate::support::http::post_json;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_login_returns_user_and_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    post_json(&app, "/users/signup", ann_signup()).await;

    let resp = post_json(
        &app,
        "/users/login",
        json!({ "username": "ann", "password": ANN_PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_success_envelope(&body);
    assert_no_password_anywhere(&body);
    assert_eq!(body["message"], "User signed in successfully");
    assert_eq!(body["user"]["username"], "ann");

    let token = body["token"].as_str().expect("token should be a string");
    let claims = verify_access_token(token, &SecurityConfig::for_tests()).unwrap();
    assert_eq!(claims.email, "ann@x.com");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

    Ok(())
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable(
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    post_json(&app, "/users/signup", ann_signup()).await;

    let wrong_password = post_json(
        &app,
        "/users/login",
        json!({ "username": "ann", "password": "wrong-password" }),
    )
    .await;
    let wrong = assert_error_envelope(
        wrong_password,
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
    )
    .await;

    let unknown_user = post_json(
        &app,
        "/users/login",
        json!({ "username": "nobody", "password": ANN_PASSWORD }),
    )
    .await;
    let unknown =
        assert_error_envelope(unknown_user, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS").await;

    assert_eq!(wrong.message, unknown.message);
    assert_eq!(wrong.message, "Invalid username or password");

    Ok(())
}

#[actix_web::test]
async fn test_login_validation_lists_fields() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let resp = post_json(&app, "/users/login", json!({ "username": "al" })).await;
    let envelope = assert_error_envelope(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let fields: Vec<&str> = envelope.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["username", "password"]);

    Ok(())
}

#[actix_web::test]
async fn test_login_with_broken_json_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let req = test::TestRequest::post()
        .uri("/users/login")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"username": "ann", "password": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let envelope = assert_error_envelope(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    assert!(envelope.message.starts_with("Invalid JSON"));

    Ok(())
}
