use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::Error;
use serde_json::Value;

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = TestRequest::post().uri(uri).set_json(body).to_request();
    test::call_service(app, req).await
}

pub async fn get_with_token<S>(app: &S, uri: &str, token: Option<&str>) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut req = TestRequest::get().uri(uri);
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    test::call_service(app, req.to_request()).await
}

/// Signs up `signup` and logs in with `password`, returning the access token.
pub async fn signup_and_login<S>(app: &S, signup: Value, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let username = signup["username"].clone();
    let resp = post_json(app, "/users/signup", signup).await;
    assert!(resp.status().is_success(), "signup failed: {}", resp.status());

    let resp = post_json(
        app,
        "/users/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| panic!("login response has no token: {body}"))
}
