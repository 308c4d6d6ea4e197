use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::IdentityClaim;
use crate::error::AppError;

/// The verified caller, as established by `JwtExtract`.
///
/// Only usable on routes wrapped by that middleware; elsewhere extraction
/// fails with 401 `UNAUTHORIZED_MISSING_BEARER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claim = req.extensions().get::<IdentityClaim>().cloned();
        ready(
            claim
                .map(|c| CurrentUser { email: c.email })
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}
