//! BDD step definitions for adding, deleting and refreshing services

use cucumber::{given, then, when};

use uptime_dashboard::io::Method;
use uptime_dashboard::views::{AddServiceView, ServiceListView};
use uptime_dashboard::DashboardEvent;

use crate::world::DashboardWorld;

fn services_body(count: usize) -> String {
    let services: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "id": format!("svc-{}", i),
                "name": format!("Service {}", i),
                "url": format!("https://svc{}.example.com", i),
                "refresh_frequency": "1 minute",
                "stats": []
            })
        })
        .collect();
    serde_json::Value::Array(services).to_string()
}

// --- Given steps ---

#[given(expr = "the backend lists {int} services")]
async fn backend_lists(world: &mut DashboardWorld, count: usize) {
    world
        .http
        .route(Method::Get, "/services/", 200, services_body(count))
        .await;
}

#[given(expr = "the backend deletes service {string}")]
async fn backend_deletes(world: &mut DashboardWorld, id: String) {
    world
        .http
        .route(Method::Delete, &format!("/services/{}", id), 204, "")
        .await;
}

#[given("the backend creates services")]
async fn backend_creates(world: &mut DashboardWorld) {
    world
        .http
        .route(
            Method::Post,
            "/services/",
            200,
            r#"{"id":"svc-new","name":"Blog","url":"https://blog.example.com","refresh_frequency":"1 minute"}"#,
        )
        .await;
}

#[given("the service list has loaded")]
async fn list_loaded(world: &mut DashboardWorld) {
    let mut list = ServiceListView::new(world.dashboard().api());
    list.load().await;
    world.list = Some(list);
    world.drain_events();
}

// --- When steps ---

#[when(expr = "I add a service named {string} with URL {string}")]
async fn add_service(world: &mut DashboardWorld, name: String, url: String) {
    let mut view = AddServiceView::new(world.dashboard().api());
    view.form.name = name;
    view.form.url = url;
    view.submit().await;
    world.add_service = Some(view);
}

#[when(expr = "I delete service {string} from the list")]
async fn delete_service(world: &mut DashboardWorld, id: String) {
    let list = world.list.as_mut().expect("list loaded");
    world.fetches_before = list.fetch_count();
    list.delete(&id).await.expect("delete service");
}

#[when("the list handles the published events")]
async fn handle_published(world: &mut DashboardWorld) {
    let events = world.drain_events();
    let list = world.list.as_mut().expect("list loaded");
    for event in &events {
        list.handle_event(event).await;
    }
}

// --- Then steps ---

#[then(expr = "the form shows {string} for {string}")]
fn form_shows(world: &mut DashboardWorld, message: String, field: String) {
    let view = world.add_service.as_ref().expect("form submitted");
    assert_eq!(view.field_errors.for_field(&field), Some(message.as_str()));
}

#[then("no request was sent")]
async fn nothing_sent(world: &mut DashboardWorld) {
    assert!(world.http.requests.read().await.is_empty());
}

#[then("the form is cleared")]
fn form_cleared(world: &mut DashboardWorld) {
    let view = world.add_service.as_ref().expect("form submitted");
    assert!(view.form.name.is_empty());
    assert!(view.form.url.is_empty());
    assert!(view.error.is_none());
}

#[then(expr = "{int} services changed event(s) was/were published")]
fn services_changed_published(world: &mut DashboardWorld, expected: usize) {
    let count = world
        .drain_events()
        .into_iter()
        .filter(|e| *e == DashboardEvent::ServicesChanged)
        .count();
    assert_eq!(count, expected);
}

#[then(expr = "the service list issued exactly {int} new fetch(es)")]
async fn new_fetches(world: &mut DashboardWorld, expected: usize) {
    let list = world.list.as_ref().expect("list loaded");
    assert_eq!(list.fetch_count() - world.fetches_before, expected);
    // initial load plus the refetches
    assert_eq!(
        world.http.count(Method::Get, "/services/").await,
        1 + expected
    );
}

#[then(expr = "the service list shows {int} services")]
fn list_shows(world: &mut DashboardWorld, expected: usize) {
    let list = world.list.as_ref().expect("list loaded");
    assert_eq!(list.state().data().map(Vec::len).unwrap_or(0), expected);
}
