// GET /user and GET /users

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{
    assert_error_envelope, assert_no_password_anywhere, assert_success_envelope,
};
use serde_json::{json, Value};

use crate::common::{ann_signup, signup_for, ANN_PASSWORD};
use crate::support::http::{get_with_token, post_json, signup_and_login};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_signup_login_then_list() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;

    let resp = get_with_token(&app, "/users", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_success_envelope(&body);
    assert_no_password_anywhere(&body);

    let users = body["users"].as_array().expect("users should be an array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "ann");

    Ok(())
}

#[actix_web::test]
async fn test_list_preserves_signup_order() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;
    post_json(&app, "/users/signup", signup_for("bob", "bob@x.com")).await;
    post_json(&app, "/users/signup", signup_for("cyd", "cyd@x.com")).await;

    let resp = get_with_token(&app, "/users", Some(&token)).await;
    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["username"].as_str())
        .collect();
    assert_eq!(names, vec!["ann", "bob", "cyd"]);

    Ok(())
}

#[actix_web::test]
async fn test_get_user_by_id() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;

    let created = post_json(&app, "/users/signup", signup_for("bob", "bob@x.com")).await;
    let created: Value = test::read_body_json(created).await;
    let bob_id = created["user"]["id"].as_str().unwrap().to_string();

    let resp = get_with_token(&app, &format!("/user?id={bob_id}"), Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_success_envelope(&body);
    assert_no_password_anywhere(&body);
    assert_eq!(body["user"]["id"], bob_id.as_str());
    assert_eq!(body["user"]["username"], "bob");

    Ok(())
}

#[actix_web::test]
async fn test_fetched_user_matches_submitted_fields() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;

    let submitted = json!({
        "name": "Ann Smith",
        "username": "AnnSmith",
        "phone": "555",
        "email": "Ann.Smith@X.com",
        "password": ANN_PASSWORD,
    });
    let created = post_json(&app, "/users/signup", submitted.clone()).await;
    assert_eq!(created.status(), StatusCode::OK);
    let created: Value = test::read_body_json(created).await;
    let id = created["user"]["id"].as_str().unwrap().to_string();

    let resp = get_with_token(&app, &format!("/user?id={id}"), Some(&token)).await;
    let body: Value = test::read_body_json(resp).await;
    assert_no_password_anywhere(&body);
    for field in ["name", "username", "email"] {
        assert_eq!(body["user"][field], submitted[field], "{field}");
    }

    Ok(())
}

#[actix_web::test]
async fn test_get_unknown_or_missing_id_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;

    for uri in ["/user?id=does-not-exist", "/user", "/user?id="] {
        let resp = get_with_token(&app, uri, Some(&token)).await;
        let envelope = assert_error_envelope(resp, StatusCode::NOT_FOUND, "USER_NOT_FOUND").await;
        assert_eq!(envelope.message, "No user found with given ID");
    }

    Ok(())
}

#[actix_web::test]
async fn test_protected_routes_without_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    post_json(&app, "/users/signup", ann_signup()).await;

    for uri in ["/users", "/user?id=anything"] {
        let resp = get_with_token(&app, uri, None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec())?;
        assert!(!text.contains("ann@x.com"), "{uri} leaked user data");

        let json: Value = serde_json::from_str(&text)?;
        assert_eq!(json["code"], "UNAUTHORIZED_MISSING_BEARER");
        assert!(json.get("users").is_none());
    }

    Ok(())
}

#[actix_web::test]
async fn test_error_trace_id_matches_request_id() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;

    let resp = get_with_token(&app, "/users", Some("garbage")).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");

    let envelope =
        assert_error_envelope(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MALFORMED_JWT").await;
    assert_eq!(envelope.trace_id, request_id);

    Ok(())
}

#[actix_web::test]
async fn test_undecodable_query_gets_error_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = signup_and_login(&app, ann_signup(), ANN_PASSWORD).await;

    let resp = get_with_token(&app, "/user?id=a&id=b", Some(&token)).await;
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let envelope = assert_error_envelope(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    assert!(envelope.message.contains("duplicate field"), "{}", envelope.message);

    Ok(())
}
