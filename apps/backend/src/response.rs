//! Success envelope shared by every endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

use crate::repos::users::PublicUser;

/// `{ok: true, status: "success", message, ...payload}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    pub status: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            ok: true,
            status: "success",
            message: message.into(),
            payload,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UsersPayload {
    pub users: Vec<PublicUser>,
}
