//! BDD step definitions for the uptime dashboard

pub mod auth_steps;
pub mod service_steps;
pub mod stats_steps;
