//! BDD step definitions for dashboard statistics

use chrono::{Duration, TimeZone, Utc};
use cucumber::{given, then, when};

use uptime_dashboard::models::{RefreshFrequency, Service, StatSample};
use uptime_dashboard::stats::{classify, summarize};

use crate::world::DashboardWorld;

fn service(index: usize, stats: Vec<StatSample>) -> Service {
    Service {
        id: format!("svc-{}", index),
        name: format!("Service {}", index),
        url: format!("https://svc{}.example.com", index),
        description: None,
        service_type: None,
        refresh_frequency: RefreshFrequency::OneMinute,
        has_notification: false,
        notification: None,
        stats,
    }
}

fn sample(status: bool, response_time: Option<f64>, minutes_ago: i64) -> StatSample {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    StatSample {
        status,
        response_time,
        ping_date: now - Duration::minutes(minutes_ago),
    }
}

fn split(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

// --- Given steps ---

#[given("no services")]
fn no_services(world: &mut DashboardWorld) {
    world.services.clear();
}

#[given(expr = "services whose latest checks are {string}")]
fn services_with_latest_checks(world: &mut DashboardWorld, checks: String) {
    world.services = split(&checks)
        .enumerate()
        .map(|(i, check)| {
            let up = check == "up";
            service(i, vec![sample(up, up.then_some(100.0), 0)])
        })
        .collect();
}

#[given(expr = "services with latest response times {string}")]
fn services_with_response_times(world: &mut DashboardWorld, times: String) {
    world.services = split(&times)
        .enumerate()
        .map(|(i, t)| {
            let ms: f64 = t.parse().expect("numeric response time");
            service(i, vec![sample(true, Some(ms), 0)])
        })
        .collect();
}

#[given(expr = "a service whose older check is {word} and newest check is {word}")]
fn service_with_history(world: &mut DashboardWorld, older: String, newest: String) {
    // listed newest first to make sure ordering comes from ping_date
    world.services.push(service(
        world.services.len(),
        vec![
            sample(newest == "up", Some(50.0), 1),
            sample(older == "up", Some(500.0), 30),
        ],
    ));
}

#[given("a service that has never been checked")]
fn service_without_samples(world: &mut DashboardWorld) {
    world.services.push(service(world.services.len(), vec![]));
}

// --- When steps ---

#[when("the dashboard summary is computed")]
fn compute_summary(world: &mut DashboardWorld) {
    world.summary = Some(summarize(&world.services));
}

// --- Then steps ---

#[then(expr = "the uptime percentage is {int}")]
fn uptime_is(world: &mut DashboardWorld, expected: u32) {
    let summary = world.summary.expect("summary computed");
    assert_eq!(summary.up_percentage, expected);
}

#[then(expr = "the average response time is {int}")]
fn average_is(world: &mut DashboardWorld, expected: u32) {
    let summary = world.summary.expect("summary computed");
    assert_eq!(summary.avg_response_time, expected);
}

#[then(expr = "the total service count is {int}")]
fn total_is(world: &mut DashboardWorld, expected: usize) {
    let summary = world.summary.expect("summary computed");
    assert_eq!(summary.total_services, expected);
}

#[then(expr = "service {int} is shown as {string}")]
fn service_badge(world: &mut DashboardWorld, index: usize, badge: String) {
    let service = &world.services[index];
    assert_eq!(classify(service).to_string(), badge);
}
