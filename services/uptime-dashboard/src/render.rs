//! Plain-text rendering of view state for the terminal front end

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

use crate::models::{NotificationPreference, Service, UserProfile};
use crate::stats::{classify, DashboardSummary};
use crate::views::{ChartSnapshot, ViewState};

/// Render any view state, delegating to `ready` once data is available
pub fn format_state<T>(state: &ViewState<T>, empty: &str, ready: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Loading => "Loading...".to_string(),
        ViewState::Error(msg) => format!("Error: {}", msg),
        ViewState::Empty => empty.to_string(),
        ViewState::Ready(data) => ready(data),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{}ms", ms.round() as i64),
        None => "-".to_string(),
    }
}

/// Service table with the latest status badge
pub fn format_services_table(services: &[Service]) -> String {
    let mut table = new_table(vec![
        "ID", "Name", "URL", "Type", "Frequency", "Status", "Response", "Alerts",
    ]);

    for s in services {
        let response = s.latest_sample().and_then(|sample| sample.response_time);
        table.add_row(vec![
            Cell::new(&s.id),
            Cell::new(&s.name),
            Cell::new(&s.url),
            Cell::new(
                s.service_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(s.refresh_frequency),
            Cell::new(classify(s)),
            Cell::new(format_ms(response)),
            Cell::new(if s.has_notification || s.notification.is_some() {
                "on"
            } else {
                "off"
            }),
        ]);
    }

    table.to_string()
}

pub fn format_services_json(services: &[Service]) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(&json!({ "services": services }))?)
}

/// The three stats cards side by side
pub fn format_summary(summary: &DashboardSummary) -> String {
    let mut table = new_table(vec!["Total Services", "Uptime", "Avg Response Time"]);
    table.add_row(vec![
        Cell::new(summary.total_services),
        Cell::new(format!("{}%", summary.up_percentage)),
        Cell::new(format!("{}ms", summary.avg_response_time)),
    ]);
    table.to_string()
}

/// Headline figures followed by one row per point
pub fn format_chart(snapshot: &ChartSnapshot) -> String {
    let mut table = new_table(vec!["Time", "Response Time"]);
    for point in &snapshot.points {
        table.add_row(vec![
            Cell::new(&point.label),
            Cell::new(match point.response_time {
                Some(_) => format_ms(point.response_time),
                None => "No Response".to_string(),
            }),
        ]);
    }

    format!(
        "Performance History - {}\nUptime: {}% | Avg Response: {}ms | Checks: {}\n{}",
        snapshot.range, snapshot.uptime_percentage, snapshot.avg_response_time, snapshot.total_checks, table
    )
}

pub fn format_notification(service_id: &str, preference: Option<&NotificationPreference>) -> String {
    match preference {
        None => format!("No notifications configured for {}", service_id),
        Some(pref) => {
            let mut table = new_table(vec!["Service", "Webhook URL", "Alert Frequency"]);
            table.add_row(vec![
                Cell::new(service_id),
                Cell::new(&pref.webhook_url),
                Cell::new(pref.alert_frequency),
            ]);
            table.to_string()
        }
    }
}

pub fn format_user(user: &UserProfile) -> String {
    format!(
        "{} (id {}, member since {})",
        user.username,
        user.id,
        user.created_at.format("%Y-%m-%d")
    )
}
