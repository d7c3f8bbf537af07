//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::json;

use crate::domain::GroupAccessService;
use crate::inbound::http::state::HttpState;
use crate::outbound::directory::{DirectorySeed, InMemoryDirectory};

/// Seed shared by handler tests.
///
/// - `root` is a global admin (member of `admin`).
/// - `alice` is a sub-admin of `staff` only.
/// - `dana` has no administrative rights.
pub const HANDLER_SEED: &str = r#"{
    "users": [
        {"id": "root", "displayName": "Root", "password": "root-pw"},
        {"id": "alice", "displayName": "Alice", "email": "alice@example.org", "password": "alice-pw"},
        {"id": "bob", "displayName": "Bob"},
        {"id": "carol"},
        {"id": "dana", "password": "dana-pw"}
    ],
    "groups": [
        {"id": "admin", "members": ["root"]},
        {"id": "staff", "displayName": "Staff", "members": ["alice", "bob", "carol", "bob"]},
        {"id": "sales", "displayName": "Sales", "members": ["dana"]}
    ],
    "subAdmins": [{"userId": "alice", "groupId": "staff"}]
}"#;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state backed by an in-memory directory loaded from [`HANDLER_SEED`].
pub fn seeded_state() -> HttpState {
    let seed = DirectorySeed::from_json(HANDLER_SEED).expect("handler seed is valid");
    let directory = Arc::new(InMemoryDirectory::from_seed(seed));
    let gateway = Arc::new(GroupAccessService::new(directory.clone(), directory.clone()));
    HttpState::from_gateway(directory, gateway)
}

/// Log in through `POST /api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "login for {username} failed with {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
