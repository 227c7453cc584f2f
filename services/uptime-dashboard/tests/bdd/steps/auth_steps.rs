//! BDD step definitions for sign-in and session expiry

use cucumber::{given, then, when};

use uptime_dashboard::io::Method;
use uptime_dashboard::models::{AuthToken, Credentials};
use uptime_dashboard::session::TokenStore;
use uptime_dashboard::views::ServiceListView;
use uptime_dashboard::DashboardEvent;

use crate::world::DashboardWorld;

// --- Given steps ---

#[given("a signed-out session")]
fn signed_out(world: &mut DashboardWorld) {
    world.store.clear().expect("clear token");
}

#[given(expr = "a session holding token {string} of type {string}")]
fn session_with_token(world: &mut DashboardWorld, access_token: String, token_type: String) {
    world
        .store
        .save(&AuthToken {
            access_token,
            token_type,
        })
        .expect("save token");
}

#[given(expr = "the backend accepts sign-in with token {string} of type {string}")]
async fn backend_accepts_sign_in(world: &mut DashboardWorld, access_token: String, token_type: String) {
    let body = serde_json::json!({
        "access_token": access_token,
        "token_type": token_type,
    });
    world
        .http
        .route(Method::Post, "/auth/sign-in", 200, body.to_string())
        .await;
}

#[given("the backend rejects sign-in")]
async fn backend_rejects_sign_in(world: &mut DashboardWorld) {
    world
        .http
        .route(
            Method::Post,
            "/auth/sign-in",
            401,
            r#"{"detail":"Incorrect username or password"}"#,
        )
        .await;
}

#[given(expr = "the backend answers the service list with status {int}")]
async fn backend_answers_list_with(world: &mut DashboardWorld, status: u16) {
    world
        .http
        .route(
            Method::Get,
            "/services/",
            status,
            r#"{"detail":"Could not validate credentials"}"#,
        )
        .await;
}

// --- When steps ---

#[when(expr = "I log in as {string} with password {string}")]
async fn log_in(world: &mut DashboardWorld, username: String, password: String) {
    let auth = world.dashboard().auth();
    if let Err(e) = auth.login(&Credentials { username, password }).await {
        world.last_error = Some(e);
    }
}

#[when("the service list is loaded")]
async fn load_service_list(world: &mut DashboardWorld) {
    let mut list = ServiceListView::new(world.dashboard().api());
    list.load().await;
    world.list = Some(list);
}

#[when("I log out")]
fn log_out(world: &mut DashboardWorld) {
    world.dashboard().auth().logout().expect("logout");
}

// --- Then steps ---

#[then("there is no authorization header")]
fn no_header(world: &mut DashboardWorld) {
    assert!(world.dashboard().auth().authorization_header().is_none());
}

#[then(expr = "the authorization header is {string}")]
fn header_is(world: &mut DashboardWorld, expected: String) {
    assert_eq!(
        world.dashboard().auth().authorization_header().as_deref(),
        Some(expected.as_str())
    );
}

#[then("the session is authenticated")]
fn is_authenticated(world: &mut DashboardWorld) {
    assert!(world.dashboard().auth().is_authenticated());
}

#[then("the session is not authenticated")]
fn is_not_authenticated(world: &mut DashboardWorld) {
    assert!(!world.dashboard().auth().is_authenticated());
    assert!(world.store.load().expect("load token").is_none());
}

#[then(expr = "the login error reads {string}")]
fn login_error(world: &mut DashboardWorld, expected: String) {
    let error = world.last_error.as_ref().expect("login failed");
    assert_eq!(error.inline_message(), expected);
}

#[then("a session expired event was published")]
fn session_expired_published(world: &mut DashboardWorld) {
    let events = world.drain_events();
    assert!(
        events.contains(&DashboardEvent::SessionExpired),
        "events: {events:?}"
    );
}

#[then(expr = "the service list shows the error {string}")]
fn list_shows_error(world: &mut DashboardWorld, expected: String) {
    let list = world.list.as_ref().expect("list loaded");
    assert_eq!(list.state().error(), Some(expected.as_str()));
}
