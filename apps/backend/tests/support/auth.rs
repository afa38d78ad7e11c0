//! Account and token helpers for route tests.

use std::time::{Duration, SystemTime};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use accounts::auth::{Identity, TokenCodec};
use accounts::state::AppState;
use serde_json::{json, Value};

pub const PASSWORD: &str = "password123";

/// `Authorization` value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Token for `user_id` signed with the state's codec, issued at `issued_at`.
pub fn token_at(state: &AppState, user_id: i64, email: &str, issued_at: SystemTime) -> String {
    state
        .tokens
        .issue(
            &Identity {
                user_id,
                email: email.to_string(),
            },
            issued_at,
        )
        .expect("should issue token")
}

/// Token whose lifetime ended an hour ago.
pub fn expired_token(state: &AppState, user_id: i64, email: &str) -> String {
    let issued_at = SystemTime::now() - state.tokens.ttl() - Duration::from_secs(3600);
    token_at(state, user_id, email, issued_at)
}

/// Token signed by a codec with another secret.
pub fn foreign_token(user_id: i64, email: &str) -> String {
    let other = accounts::SecurityConfig::new(b"some-other-secret-some-other-secret".to_vec());
    TokenCodec::new(&other)
        .issue(
            &Identity {
                user_id,
                email: email.to_string(),
            },
            SystemTime::now(),
        )
        .expect("should issue token")
}

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    test::call_service(app, req).await
}

/// Register through the API; returns the new user id.
pub async fn register<S>(app: &S, email: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post_json(app, "/register", json!({ "email": email, "password": PASSWORD })).await;
    assert_eq!(resp.status().as_u16(), 201, "register {email}");
    let body: Value = test::read_body_json(resp).await;
    body["id"].as_i64().expect("id in register response")
}

/// Log in through the API; returns the token.
pub async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post_json(app, "/login", json!({ "email": email, "password": PASSWORD })).await;
    assert_eq!(resp.status().as_u16(), 200, "login {email}");
    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("token in login response").to_string()
}

/// Register then log in; returns (user id, token).
pub async fn signup<S>(app: &S, email: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let id = register(app, email).await;
    (id, login(app, email).await)
}
