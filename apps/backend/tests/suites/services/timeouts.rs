// A stalled store must fail requests with DB_TIMEOUT instead of hanging them.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use backend::services::accounts::{LoginRequest, SignupRequest};
use backend::AppError;
use backend_test_support::envelope::assert_error_envelope;
use serde_json::json;

use crate::common::{ann_signup, ANN_PASSWORD};
use crate::support::create_test_app;
use crate::support::http::{get_with_token, post_json};
use crate::support::state::build_state_over;
use crate::support::stores::{StalledStore, UnavailableStore};

const SHORT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_service_calls_time_out() -> Result<(), AppError> {
    let store = Arc::new(StalledStore::default());
    let state = build_state_over(store.clone(), SHORT).await?;
    let started = Instant::now();

    let listed = state.accounts.list_users().await.unwrap_err();
    assert!(matches!(listed, AppError::DbTimeout { .. }));

    let login = state
        .accounts
        .login(LoginRequest {
            username: "ann".into(),
            password: ANN_PASSWORD.into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(login, AppError::DbTimeout { .. }));

    let register = state
        .accounts
        .register(SignupRequest {
            name: "Ann".into(),
            username: "ann".into(),
            phone: "555".into(),
            email: "ann@x.com".into(),
            password: ANN_PASSWORD.into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(register, AppError::DbTimeout { .. }));

    assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() < Duration::from_secs(5));

    Ok(())
}

#[actix_web::test]
async fn test_http_requests_report_db_timeout() -> Result<(), AppError> {
    let state = build_state_over(Arc::new(StalledStore::default()), SHORT).await?;
    let app = create_test_app(state).build().await;

    let resp = post_json(&app, "/users/signup", ann_signup()).await;
    assert_error_envelope(resp, StatusCode::INTERNAL_SERVER_ERROR, "DB_TIMEOUT").await;

    let resp = post_json(
        &app,
        "/users/login",
        json!({ "username": "ann", "password": ANN_PASSWORD }),
    )
    .await;
    let envelope =
        assert_error_envelope(resp, StatusCode::INTERNAL_SERVER_ERROR, "DB_TIMEOUT").await;
    assert_eq!(envelope.message, "Database operation timed out");

    Ok(())
}

#[actix_web::test]
async fn test_validation_runs_before_the_store() -> Result<(), AppError> {
    let store = Arc::new(StalledStore::default());
    let state = build_state_over(store.clone(), SHORT).await?;
    let app = create_test_app(state).build().await;

    let resp = post_json(&app, "/users/signup", json!({ "username": "ann" })).await;
    assert_error_envelope(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[actix_web::test]
async fn test_unavailable_store_is_server_error() -> Result<(), AppError> {
    let state = build_state_over(Arc::new(UnavailableStore), SHORT).await?;
    let app = create_test_app(state).build().await;
    let token = backend::mint_access_token(
        "ann@x.com",
        std::time::SystemTime::now(),
        &backend::SecurityConfig::for_tests(),
    )?;

    let resp = get_with_token(&app, "/users", Some(&token)).await;
    assert_error_envelope(resp, StatusCode::INTERNAL_SERVER_ERROR, "DB_UNAVAILABLE").await;

    Ok(())
}
