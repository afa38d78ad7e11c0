//! Registration and login over HTTP.

mod common;
mod support;

use std::time::{Duration, SystemTime};

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};
use support::auth::{post_json, register, PASSWORD};
use support::{create_test_app, test_state};

#[actix_web::test]
async fn register_returns_created_user_with_normalized_email() {
    let state = test_state().await;
    let app = create_test_app(state).build().await;

    let resp = post_json(
        &app,
        "/register",
        json!({ "email": "  Alice@Example.COM ", "password": PASSWORD }),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn login_token_names_the_user() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).build().await;
    let id = register(&app, "alice@example.com").await;

    let resp = post_json(
        &app,
        "/login",
        json!({ "email": "alice@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["email"], "alice@example.com");

    let token = body["token"].as_str().unwrap();
    let claims = state
        .tokens
        .verify(token, SystemTime::now() + Duration::from_secs(1))
        .unwrap();
    assert_eq!(claims.user_id, id);
    assert_eq!(claims.exp - claims.iat, 900);
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let state = test_state().await;
    let app = create_test_app(state).build().await;
    register(&app, "alice@example.com").await;

    let wrong = post_json(
        &app,
        "/login",
        json!({ "email": "alice@example.com", "password": "password124" }),
    )
    .await;
    let wrong = assert_problem_details_from_service_response(
        wrong,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let unknown = post_json(
        &app,
        "/login",
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    )
    .await;
    let unknown = assert_problem_details_from_service_response(
        unknown,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    assert_eq!(wrong.detail, unknown.detail);
    assert_eq!(wrong.title, unknown.title);
    assert_eq!(wrong.type_, unknown.type_);
    assert_ne!(wrong.trace_id, unknown.trace_id);
}

#[actix_web::test]
async fn register_validation_errors() {
    let state = test_state().await;
    let app = create_test_app(state).build().await;

    let cases = [
        (json!({ "email": "not-an-email", "password": PASSWORD }), "INVALID_EMAIL"),
        (json!({ "email": "", "password": PASSWORD }), "INVALID_EMAIL"),
        (json!({ "email": "a@example.com", "password": "short" }), "WEAK_PASSWORD"),
        (json!({ "email": "a@example.com", "password": "" }), "WEAK_PASSWORD"),
        (
            json!({ "email": "a@example.com", "password": "x".repeat(73) }),
            "WEAK_PASSWORD",
        ),
        (json!({ "email": "a@example.com" }), "BAD_REQUEST"),
    ];

    for (body, code) in cases {
        let resp = post_json(&app, "/register", body).await;
        assert_problem_details_from_service_response(resp, code, StatusCode::BAD_REQUEST, None)
            .await;
    }
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let state = test_state().await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/register")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"email": "a@example.com", "password": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;
}

#[actix_web::test]
async fn duplicate_email_conflicts_regardless_of_case() {
    let state = test_state().await;
    let app = create_test_app(state).build().await;
    register(&app, "alice@example.com").await;

    let resp = post_json(
        &app,
        "/register",
        json!({ "email": "ALICE@example.com", "password": "another-password" }),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "EMAIL_EXISTS",
        StatusCode::CONFLICT,
        None,
    )
    .await;
}
