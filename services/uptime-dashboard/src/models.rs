//! Wire types shared with the monitoring backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Bearer token returned by sign-in and sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl AuthToken {
    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Username and password posted to `/auth/sign-in` and `/auth/sign-up`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The signed-in user as returned by `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// How often the backend checks a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshFrequency {
    #[serde(rename = "1 minute")]
    OneMinute,
    #[serde(rename = "10 minutes")]
    TenMinutes,
    #[serde(rename = "1 hour")]
    OneHour,
}

impl std::fmt::Display for RefreshFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshFrequency::OneMinute => write!(f, "1 minute"),
            RefreshFrequency::TenMinutes => write!(f, "10 minutes"),
            RefreshFrequency::OneHour => write!(f, "1 hour"),
        }
    }
}

impl std::str::FromStr for RefreshFrequency {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1 minute" | "1m" => Ok(RefreshFrequency::OneMinute),
            "10 minutes" | "10m" => Ok(RefreshFrequency::TenMinutes),
            "1 hour" | "1h" => Ok(RefreshFrequency::OneHour),
            other => Err(DashboardError::Config(format!(
                "Unknown refresh frequency: {}",
                other
            ))),
        }
    }
}

/// Kind of monitored endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "Landing Page")]
    LandingPage,
    #[serde(rename = "Server")]
    Server,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Api => write!(f, "API"),
            ServiceType::LandingPage => write!(f, "Landing Page"),
            ServiceType::Server => write!(f, "Server"),
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "API" | "api" => Ok(ServiceType::Api),
            "Landing Page" | "landing-page" => Ok(ServiceType::LandingPage),
            "Server" | "server" => Ok(ServiceType::Server),
            other => Err(DashboardError::Config(format!(
                "Unknown service type: {}",
                other
            ))),
        }
    }
}

/// One health-check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    pub status: bool,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(with = "timestamp")]
    pub ping_date: DateTime<Utc>,
}

/// A monitored service snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub service_type: Option<ServiceType>,
    pub refresh_frequency: RefreshFrequency,
    #[serde(default)]
    pub has_notification: bool,
    #[serde(default)]
    pub notification: Option<NotificationPreference>,
    /// Most recent samples, in no guaranteed order
    #[serde(default)]
    pub stats: Vec<StatSample>,
}

impl Service {
    /// The sample with the greatest `ping_date`
    pub fn latest_sample(&self) -> Option<&StatSample> {
        self.stats.iter().max_by_key(|s| s.ping_date)
    }
}

/// Body of `POST /services/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub refresh_frequency: RefreshFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How often alerts for a service are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    #[serde(alias = "DAILY")]
    Daily,
    #[serde(alias = "ALWAYS")]
    Always,
}

impl std::fmt::Display for AlertFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertFrequency::Daily => write!(f, "daily"),
            AlertFrequency::Always => write!(f, "always"),
        }
    }
}

impl std::str::FromStr for AlertFrequency {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(AlertFrequency::Daily),
            "always" => Ok(AlertFrequency::Always),
            other => Err(DashboardError::Config(format!(
                "Unknown alert frequency: {}",
                other
            ))),
        }
    }
}

/// Webhook alert configuration for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    pub webhook_url: String,
    pub alert_frequency: AlertFrequency,
}

/// Up/down check counts within one window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub up: u64,
    pub down: u64,
}

/// Server-side aggregation over one time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub period: String,
    pub uptime_percentage: f64,
    pub avg_response_time: f64,
    pub status_counts: StatusCounts,
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub response_times: Vec<Option<f64>>,
}

impl AggregatedStats {
    pub fn total_checks(&self) -> u64 {
        self.status_counts.up + self.status_counts.down
    }
}

/// Response of `GET /services/{id}/stats/aggregated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub service_id: String,
    pub stats_1h: AggregatedStats,
    pub stats_24h: AggregatedStats,
    pub stats_7d: AggregatedStats,
    pub stats_30d: AggregatedStats,
}

impl ServiceStats {
    pub fn window(&self, range: TimeRange) -> &AggregatedStats {
        match range {
            TimeRange::Hour => &self.stats_1h,
            TimeRange::Day => &self.stats_24h,
            TimeRange::Week => &self.stats_7d,
            TimeRange::Month => &self.stats_30d,
        }
    }
}

/// Chart window selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    Hour,
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Hour,
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
    ];
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Hour => write!(f, "1h"),
            TimeRange::Day => write!(f, "24h"),
            TimeRange::Week => write!(f, "7d"),
            TimeRange::Month => write!(f, "30d"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(TimeRange::Hour),
            "24h" => Ok(TimeRange::Day),
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            other => Err(DashboardError::Config(format!(
                "Unknown time range: {}",
                other
            ))),
        }
    }
}

/// Parse a backend timestamp: RFC 3339, or ISO-8601 without offset (read as UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for [`parse_timestamp`]
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
