// POST /users/signup

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{
    assert_error_envelope, assert_no_password_anywhere, assert_success_envelope,
};
use serde_json::{json, Value};

use crate::common::{ann_signup, signup_for};
use crate::support::http::post_json;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_signup_returns_user_without_password() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let resp = post_json(&app, "/users/signup", ann_signup()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_success_envelope(&body);
    assert_no_password_anywhere(&body);
    assert_eq!(body["message"], "Ann added successfully");
    assert_eq!(body["user"]["username"], "ann");
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert!(body["user"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["user"]["created_at"], body["user"]["updated_at"]);

    Ok(())
}

#[actix_web::test]
async fn test_signup_reports_every_invalid_field() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let resp = post_json(
        &app,
        "/users/signup",
        json!({ "username": "a", "email": "nope", "password": "short" }),
    )
    .await;
    let envelope = assert_error_envelope(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let fields: Vec<&str> = envelope.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "username", "phone", "email", "password"]);
    assert!(envelope.message.contains("name is required"));

    Ok(())
}

#[actix_web::test]
async fn test_invalid_signup_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let accounts = state.accounts.clone();
    let app = create_test_app(state).build().await;

    let mut body = ann_signup();
    body["email"] = json!("not-an-email");
    let resp = post_json(&app, "/users/signup", body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(accounts.list_users().await?.is_empty());

    Ok(())
}

#[actix_web::test]
async fn test_duplicate_username_is_persistence_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let first = post_json(&app, "/users/signup", ann_signup()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let again = post_json(&app, "/users/signup", signup_for("ann", "other@x.com")).await;
    let envelope =
        assert_error_envelope(again, StatusCode::INTERNAL_SERVER_ERROR, "UNIQUE_USERNAME").await;
    assert_eq!(envelope.message, "Username already taken");

    Ok(())
}

#[actix_web::test]
async fn test_duplicate_email_is_persistence_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    post_json(&app, "/users/signup", ann_signup()).await;
    let again = post_json(&app, "/users/signup", signup_for("annie", "ann@x.com")).await;
    let envelope =
        assert_error_envelope(again, StatusCode::INTERNAL_SERVER_ERROR, "UNIQUE_EMAIL").await;
    assert_eq!(envelope.message, "Email already registered");

    Ok(())
}

#[actix_web::test]
async fn test_email_with_surrounding_space_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let resp = post_json(&app, "/users/signup", signup_for("annie", " ann@x.com")).await;
    let envelope = assert_error_envelope(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    let fields: Vec<&str> = envelope.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["email"]);

    Ok(())
}
