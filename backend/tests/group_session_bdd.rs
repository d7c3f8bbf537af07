//! Behaviour tests for session-enforced group endpoints.
//!
//! These scenarios confirm that `/api/v1/groups` requires an authenticated
//! session, that admin-only routes reject other callers, and that error
//! bodies echo the request trace identifier.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::Method;
use actix_web::{App, test as actix_test, web};
use provisioning::Trace;
use provisioning::domain::{GroupAccessService, TRACE_ID_HEADER};
use provisioning::inbound::http::groups;
use provisioning::inbound::http::state::HttpState;
use provisioning::inbound::http::users::login;
use provisioning::outbound::directory::{DirectorySeed, InMemoryDirectory};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

const SEED: &str = r#"{
    "users": [
        {"id": "root", "password": "root-pw"},
        {"id": "alice", "password": "alice-pw"},
        {"id": "dana", "password": "dana-pw"}
    ],
    "groups": [
        {"id": "admin", "members": ["root"]},
        {"id": "staff", "members": ["alice"]},
        {"id": "sales", "members": ["dana"]}
    ],
    "subAdmins": [{"userId": "alice", "groupId": "staff"}]
}"#;

struct RequestSpec {
    method: Method,
    path: &'static str,
    payload: Option<Value>,
    trace_id: Option<String>,
    with_session: bool,
}

#[derive(Default)]
struct Outcome {
    status: Option<u16>,
    trace_id: Option<String>,
    body: Option<Value>,
}

struct SessionWorld {
    state: HttpState,
    key: Key,
    cookie: RefCell<Option<Cookie<'static>>>,
    outcome: RefCell<Outcome>,
}

impl SessionWorld {
    fn new() -> Self {
        let seed = DirectorySeed::from_json(SEED).expect("scenario seed is valid");
        let directory = Arc::new(InMemoryDirectory::from_seed(seed));
        let gateway = Arc::new(GroupAccessService::new(directory.clone(), directory.clone()));
        Self {
            state: HttpState::from_gateway(directory, gateway),
            key: Key::generate(),
            cookie: RefCell::new(None),
            outcome: RefCell::new(Outcome::default()),
        }
    }

    fn send(&self, spec: RequestSpec) -> (u16, Option<String>, Vec<u8>, Option<Cookie<'static>>) {
        let state = self.state.clone();
        let key = self.key.clone();
        let cookie = if spec.with_session {
            self.cookie.borrow().clone()
        } else {
            None
        };
        actix_web::rt::System::new().block_on(async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .wrap(Trace)
                    .service(
                        web::scope("/api/v1")
                            .wrap(
                                SessionMiddleware::builder(CookieSessionStore::default(), key)
                                    .cookie_name("session".to_owned())
                                    .cookie_secure(false)
                                    .build(),
                            )
                            .service(login)
                            .configure(groups::configure),
                    ),
            )
            .await;

            let mut request = actix_test::TestRequest::default()
                .method(spec.method)
                .uri(spec.path);
            if let Some(payload) = spec.payload {
                request = request.set_json(payload);
            }
            if let Some(trace_id) = spec.trace_id {
                request = request.insert_header((TRACE_ID_HEADER, trace_id));
            }
            if let Some(cookie) = cookie {
                request = request.cookie(cookie);
            }
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let cookie = response
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .map(Cookie::into_owned);
            let body = actix_test::read_body(response).await.to_vec();
            (status, trace_id, body, cookie)
        })
    }

    fn perform(&self, spec: RequestSpec) {
        let (status, trace_id, body, _) = self.send(spec);
        let body = (!body.is_empty())
            .then(|| serde_json::from_slice(&body).expect("json body"));
        *self.outcome.borrow_mut() = Outcome {
            status: Some(status),
            trace_id,
            body,
        };
    }
}

fn list_groups(with_session: bool, trace_id: Option<String>) -> RequestSpec {
    RequestSpec {
        method: Method::GET,
        path: "/api/v1/groups",
        payload: None,
        trace_id,
        with_session,
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("a running server with session middleware")]
fn a_running_server_with_session_middleware(world: &SessionWorld) {
    let _ = world;
}

#[given("the client is logged in as {user}")]
fn the_client_is_logged_in_as(world: &SessionWorld, user: String) {
    let (status, _, _, cookie) = world.send(RequestSpec {
        method: Method::POST,
        path: "/api/v1/login",
        payload: Some(json!({ "username": user, "password": format!("{user}-pw") })),
        trace_id: None,
        with_session: false,
    });
    assert_eq!(status, 200, "login as {user}");
    *world.cookie.borrow_mut() = Some(cookie.expect("session cookie"));
}

#[when("the client lists groups without a session")]
fn the_client_lists_groups_without_a_session(world: &SessionWorld) {
    world.perform(list_groups(false, None));
}

#[when("the client lists groups without a session using trace id {trace_id}")]
fn the_client_lists_groups_with_trace_id(world: &SessionWorld, trace_id: String) {
    world.perform(list_groups(false, Some(trace_id)));
}

#[when("the client lists groups")]
fn the_client_lists_groups(world: &SessionWorld) {
    world.perform(list_groups(true, None));
}

#[when("the client creates the group {group}")]
fn the_client_creates_the_group(world: &SessionWorld, group: String) {
    world.perform(RequestSpec {
        method: Method::POST,
        path: "/api/v1/groups",
        payload: Some(json!({ "groupid": group })),
        trace_id: None,
        with_session: true,
    });
}

#[then("the response is unauthorised with a trace id")]
fn the_response_is_unauthorised_with_a_trace_id(world: &SessionWorld) {
    let outcome = world.outcome.borrow();
    assert_eq!(outcome.status, Some(401));
    let trace_id = outcome.trace_id.as_deref().expect("trace id header");
    let body = outcome.body.as_ref().expect("error body");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

#[then("the trace id is {trace_id}")]
fn the_trace_id_is(world: &SessionWorld, trace_id: String) {
    let outcome = world.outcome.borrow();
    assert_eq!(outcome.trace_id.as_deref(), Some(trace_id.as_str()));
}

#[then("the response lists the groups {ids}")]
fn the_response_lists_the_groups(world: &SessionWorld, ids: String) {
    let outcome = world.outcome.borrow();
    assert_eq!(outcome.status, Some(200));
    let expected: Vec<&str> = ids.split(',').collect();
    assert_eq!(outcome.body, Some(json!({ "groups": expected })));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &SessionWorld, status: u16) {
    assert_eq!(world.outcome.borrow().status, Some(status));
}

#[scenario(path = "tests/features/group_session.feature")]
fn group_session_scenarios(world: SessionWorld) {
    drop(world);
}
