//! Client-side aggregation of per-service samples

use serde::Serialize;

use crate::models::{Service, StatSample};

/// Badge shown for a service in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceStatus {
    Up,
    Down,
    NoData,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Up => write!(f, "UP"),
            ServiceStatus::Down => write!(f, "DOWN"),
            ServiceStatus::NoData => write!(f, "NO DATA"),
        }
    }
}

/// Figures shown on the stats cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_services: usize,
    pub up_percentage: u32,
    pub avg_response_time: u32,
}

/// Percentage of sampled services whose latest sample is up, rounded
///
/// Services without samples are left out; 0 when none have samples.
pub fn up_percentage(services: &[Service]) -> u32 {
    let latest: Vec<&StatSample> = services.iter().filter_map(Service::latest_sample).collect();
    if latest.is_empty() {
        return 0;
    }
    let up = latest.iter().filter(|s| s.status).count();
    (100.0 * up as f64 / latest.len() as f64).round() as u32
}

/// Rounded mean of the latest response time across services, 0 when empty
pub fn avg_response_time(services: &[Service]) -> u32 {
    let times: Vec<f64> = services
        .iter()
        .filter_map(Service::latest_sample)
        .filter_map(|s| s.response_time)
        .collect();
    rounded_mean(&times)
}

pub fn summarize(services: &[Service]) -> DashboardSummary {
    DashboardSummary {
        total_services: services.len(),
        up_percentage: up_percentage(services),
        avg_response_time: avg_response_time(services),
    }
}

pub fn classify(service: &Service) -> ServiceStatus {
    match service.latest_sample() {
        None => ServiceStatus::NoData,
        Some(sample) if sample.status => ServiceStatus::Up,
        Some(_) => ServiceStatus::Down,
    }
}

fn rounded_mean(values: &[f64]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.max(0.0).round() as u32
}
