//! Bearer-token gate for protected routes.
//!
//! Verifies the `Authorization` header and stores the resulting
//! [`IdentityClaim`] in request extensions. Requests without a valid token
//! are answered with a 401 envelope and never reach the handler.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::jwt::{authenticate_bearer, TokenRejection};
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

enum Rejection {
    Token(TokenRejection),
    MissingState,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match req.app_data::<web::Data<AppState>>() {
            Some(state) => {
                // a non-UTF-8 header cannot hold a JWT
                let header = req.headers().get(header::AUTHORIZATION).map(|v| v.to_str());
                match header {
                    Some(Err(_)) => Err(Rejection::Token(TokenRejection::Malformed)),
                    Some(Ok(value)) => authenticate_bearer(Some(value), &state.security)
                        .map_err(Rejection::Token),
                    None => authenticate_bearer(None, &state.security).map_err(Rejection::Token),
                }
            }
            None => Err(Rejection::MissingState),
        };

        match outcome {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => Box::pin(async move {
                // built here so the error sees the request's trace id
                let err = match rejection {
                    Rejection::Token(r) => {
                        debug!(reason = %r, "bearer token rejected");
                        AppError::from(r)
                    }
                    Rejection::MissingState => AppError::internal("AppState not available"),
                };
                Ok(req.error_response(err).map_into_right_body())
            }),
        }
    }
}
