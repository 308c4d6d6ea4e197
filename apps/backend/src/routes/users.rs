use actix_web::error::QueryPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::logging::pii::Redacted;
use crate::middleware::jwt_extract::JwtExtract;
use crate::repos::users::PublicUser;
use crate::response::{Envelope, LoginPayload, UserPayload, UsersPayload};
use crate::services::accounts::{LoginRequest, SignupRequest};
use crate::state::app_state::AppState;

async fn signup(
    body: ValidatedJson<SignupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = app_state.accounts.register(body.into_inner()).await?;
    let message = format!("{} added successfully", user.name);

    Ok(Envelope::success(message, UserPayload { user: user.into() }).into_response())
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state.accounts.login(body.into_inner()).await?;

    Ok(Envelope::success(
        "User signed in successfully",
        LoginPayload {
            user: outcome.user.into(),
            token: outcome.token,
        },
    )
    .into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserQuery {
    id: String,
}

/// Query strings that fail to decode get the standard error envelope.
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = match err {
        QueryPayloadError::Deserialize(e) => format!("Invalid query string: {e}"),
        _ => "Invalid query string".to_string(),
    };
    AppError::bad_request(ErrorCode::BadRequest, detail).into()
}

async fn get_user(
    query: web::Query<UserQuery>,
    caller: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(caller = %Redacted(&caller.email), "user lookup");
    let user = app_state.accounts.get_user(&query.id).await?;

    Ok(Envelope::success("User retrieved successfully", UserPayload { user: user.into() })
        .into_response())
}

async fn list_users(
    caller: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(caller = %Redacted(&caller.email), "user listing");
    let users = app_state
        .accounts
        .list_users()
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Envelope::success("Users retrieved successfully", UsersPayload { users }).into_response())
}

/// Signup and login are public; the lookups sit behind [`JwtExtract`].
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/signup").route(web::post().to(signup)))
        .service(web::resource("/users/login").route(web::post().to(login)))
        .service(
            web::resource("/user")
                .app_data(web::QueryConfig::default().error_handler(query_error))
                .wrap(JwtExtract)
                .route(web::get().to(get_user)),
        )
        .service(
            web::resource("/users")
                .wrap(JwtExtract)
                .route(web::get().to(list_users)),
        );
}
