// Password hashing cost at production parameters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use backend::auth::password::CredentialHasher;
use backend::services::accounts::{LoginRequest, SignupRequest};
use backend::{build_state, AppError, AppState, SecurityConfig};

use crate::common::ANN_PASSWORD;
use crate::support::stores::UnavailableStore;

async fn default_cost_state() -> Result<AppState, AppError> {
    build_state()
        .with_database_url("sqlite::memory:", true)
        .with_security(SecurityConfig::for_tests())
        .with_hasher(CredentialHasher::default())
        .build()
        .await
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.into(),
        password: password.into(),
    }
}

async fn fastest_rejection(state: &AppState, username: &str, password: &str) -> Duration {
    let mut best = Duration::MAX;
    for _ in 0..3 {
        let started = Instant::now();
        let err = state.accounts.login(login(username, password)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        best = best.min(started.elapsed());
    }
    best
}

#[tokio::test]
async fn test_unknown_username_costs_a_verification() -> Result<(), AppError> {
    let state = default_cost_state().await?;
    state
        .accounts
        .register(SignupRequest {
            name: "Ann".into(),
            username: "ann".into(),
            phone: "555".into(),
            email: "ann@x.com".into(),
            password: ANN_PASSWORD.into(),
        })
        .await?;

    // first unknown-user login also builds the decoy hash
    let _ = state.accounts.login(login("nobody", ANN_PASSWORD)).await;

    let wrong_password = fastest_rejection(&state, "ann", "not-the-password").await;
    let unknown_user = fastest_rejection(&state, "nobody", ANN_PASSWORD).await;
    assert!(
        unknown_user * 3 >= wrong_password,
        "unknown {unknown_user:?} vs wrong password {wrong_password:?}"
    );

    Ok(())
}

#[tokio::test]
async fn test_hashing_does_not_block_the_runtime() -> Result<(), AppError> {
    let started = Instant::now();
    CredentialHasher::default().hash(ANN_PASSWORD)?;
    let hash_cost = started.elapsed();

    let state = build_state()
        .with_store(Arc::new(UnavailableStore))
        .with_security(SecurityConfig::for_tests())
        .with_hasher(CredentialHasher::default())
        .build()
        .await?;

    // single-threaded runtime: a timer only fires on time if register yields
    let accounts = state.accounts.clone();
    let register = tokio::spawn(async move {
        accounts
            .register(SignupRequest {
                name: "Ann".into(),
                username: "ann".into(),
                phone: "555".into(),
                email: "ann@x.com".into(),
                password: ANN_PASSWORD.into(),
            })
            .await
    });

    let started = Instant::now();
    tokio::time::sleep(Duration::from_millis(1)).await;
    let woke_after = started.elapsed();

    let outcome = register.await.expect("register task panicked");
    assert!(matches!(outcome, Err(AppError::Db { .. })));
    assert!(
        woke_after < hash_cost / 2,
        "timer woke after {woke_after:?}, one hash costs {hash_cost:?}"
    );

    Ok(())
}
