//! Response-time history for one service

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::ServiceApiClient;
use crate::error::DashboardError;
use crate::events::DashboardEvent;
use crate::models::{parse_timestamp, AggregatedStats, ServiceStats, TimeRange};

use super::ViewState;

/// One plotted sample; `response_time` is `None` when the check got no response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub label: String,
    pub response_time: Option<f64>,
}

/// Everything the chart shows for the selected window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSnapshot {
    pub range: TimeRange,
    pub points: Vec<ChartPoint>,
    pub uptime_percentage: f64,
    pub avg_response_time: u32,
    pub total_checks: u64,
}

impl ChartSnapshot {
    pub fn from_stats(stats: &AggregatedStats, range: TimeRange) -> Self {
        let points = stats
            .timestamps
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let timestamp = parse_timestamp(raw);
                ChartPoint {
                    timestamp,
                    label: timestamp
                        .map(|ts| axis_label(ts, range))
                        .unwrap_or_else(|| raw.clone()),
                    response_time: stats.response_times.get(i).copied().flatten(),
                }
            })
            .collect();

        Self {
            range,
            points,
            uptime_percentage: stats.uptime_percentage,
            avg_response_time: stats.avg_response_time.max(0.0).round() as u32,
            total_checks: stats.total_checks(),
        }
    }
}

/// HH:MM for the short windows, the date for the long ones
pub fn axis_label(timestamp: DateTime<Utc>, range: TimeRange) -> String {
    match range {
        TimeRange::Hour | TimeRange::Day => timestamp.format("%H:%M").to_string(),
        TimeRange::Week | TimeRange::Month => timestamp.format("%Y-%m-%d").to_string(),
    }
}

#[derive(Debug)]
pub struct ChartView {
    api: Arc<ServiceApiClient>,
    service_id: String,
    range: TimeRange,
    stats: Option<ServiceStats>,
    state: ViewState<ChartSnapshot>,
}

impl ChartView {
    pub fn new(api: Arc<ServiceApiClient>, service_id: impl Into<String>, range: TimeRange) -> Self {
        Self {
            api,
            service_id: service_id.into(),
            range,
            stats: None,
            state: ViewState::Loading,
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn state(&self) -> &ViewState<ChartSnapshot> {
        &self.state
    }

    /// Switch window; the last fetched stats already hold every window
    pub fn select_range(&mut self, range: TimeRange) {
        self.range = range;
        if let Some(stats) = &self.stats {
            self.state = snapshot_state(stats, range);
        }
    }

    pub async fn load(&mut self) {
        match self.api.service_stats(&self.service_id).await {
            Ok(stats) => {
                self.state = snapshot_state(&stats, self.range);
                self.stats = Some(stats);
            }
            Err(e) => {
                tracing::warn!("Failed to load stats for {}: {}", self.service_id, e);
                self.state = ViewState::Error(e.inline_message());
            }
        }
    }

    /// True once the session token is gone
    pub fn session_expired(&self) -> bool {
        !self.api.session().is_authenticated()
    }

    /// React to a bus event; returns whether a refetch happened
    pub async fn handle_event(&mut self, event: &DashboardEvent) -> bool {
        match event {
            DashboardEvent::ServicesChanged => {
                self.load().await;
                true
            }
            DashboardEvent::NotificationsChanged { .. } => false,
            DashboardEvent::SessionExpired => {
                self.state = ViewState::Error(DashboardError::AuthenticationExpired.inline_message());
                false
            }
        }
    }

    /// Refetch every `interval` and on `ServicesChanged`, calling `on_update`
    /// after each change. Returns when `cancel` fires or the session expires.
    pub async fn run<F>(&mut self, interval: Duration, cancel: CancellationToken, mut on_update: F)
    where
        F: FnMut(&ChartView),
    {
        let mut events = self.api.events().subscribe();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Chart polling for '{}' cancelled", self.service_id);
                    break;
                }
                received = events.recv() => {
                    match received {
                        Ok(event) => {
                            let refetched = self.handle_event(&event).await;
                            if refetched || event == DashboardEvent::SessionExpired {
                                on_update(self);
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Chart missed {} events, reloading", skipped);
                            self.load().await;
                            on_update(self);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                _ = ticker.tick() => {
                    self.load().await;
                    on_update(self);
                }
            }

            if self.session_expired() {
                tracing::info!("Session expired, stopping chart polling for '{}'", self.service_id);
                break;
            }
        }
    }
}

fn snapshot_state(stats: &ServiceStats, range: TimeRange) -> ViewState<ChartSnapshot> {
    let window = stats.window(range);
    if window.timestamps.is_empty() && window.total_checks() == 0 {
        ViewState::Empty
    } else {
        ViewState::Ready(ChartSnapshot::from_stats(window, range))
    }
}
