//! Tests for the login handler.

use std::sync::Arc;

use super::*;
use crate::domain::UserId;
use crate::domain::ports::MockLoginService;
use crate::inbound::http::test_utils::{seeded_state, test_session_middleware};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").service(login))
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: username.into(),
            password: password.into(),
        })
        .to_request()
}

#[rstest]
#[case(
    "   ",
    "password",
    ValidationExpectation {
        message: "username must not be empty",
        field: "username",
        code: "empty_username",
    }
)]
#[case(
    "alice",
    "",
    ValidationExpectation {
        message: "password must not be empty",
        field: "password",
        code: "empty_password",
    }
)]
#[actix_web::test]
async fn login_rejects_malformed_credentials(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let app = actix_test::init_service(test_app(seeded_state())).await;

    let response = actix_test::call_service(&app, login_request(username, password)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some(expected.message)
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = value
        .get("details")
        .and_then(Value::as_object)
        .expect("details present");
    assert_eq!(
        details.get("field").and_then(Value::as_str),
        Some(expected.field)
    );
    assert_eq!(
        details.get("code").and_then(Value::as_str),
        Some(expected.code)
    );
}

#[rstest]
#[case("alice", "wrong-password")]
#[case("bob", "anything")]
#[case("mallory", "alice-pw")]
#[actix_web::test]
async fn login_rejects_unknown_or_wrong_credentials(
    #[case] username: &str,
    #[case] password: &str,
) {
    let app = actix_test::init_service(test_app(seeded_state())).await;

    let response = actix_test::call_service(&app, login_request(username, password)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response
            .response()
            .cookies()
            .all(|cookie| cookie.name() != "session"),
        "failed logins must not issue a session"
    );
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

#[actix_web::test]
async fn successful_login_sets_session_cookie() {
    let app = actix_test::init_service(test_app(seeded_state())).await;

    let response = actix_test::call_service(&app, login_request("alice", "alice-pw")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"),
        "successful login must issue a session cookie"
    );
}

#[actix_web::test]
async fn login_passes_trimmed_username_to_port() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_authenticate()
        .withf(|credentials| credentials.username() == "alice")
        .times(1)
        .returning(|_| Ok(UserId::new("alice").expect("valid id")));
    let mut state = seeded_state();
    state.login = Arc::new(login_service);
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(&app, login_request("  alice  ", "pw")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
