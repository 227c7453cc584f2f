//! Error types for the uptime dashboard

use crate::forms::ValidationErrors;

/// Errors that can occur while driving the dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Sign up failed: {0}")]
    SignUpRejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Authentication expired")]
    AuthenticationExpired,

    #[error("No authentication token available")]
    NotAuthenticated,

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// True for fetch rejections and non-2xx responses
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DashboardError::Network(_) | DashboardError::Status { .. }
        )
    }

    /// The short message a view shows next to the action that failed
    pub fn inline_message(&self) -> String {
        match self {
            DashboardError::Validation(errors) => errors.to_string(),
            DashboardError::InvalidCredentials => "Invalid username or password".to_string(),
            DashboardError::SignUpRejected(detail) => detail.clone(),
            DashboardError::AuthenticationExpired | DashboardError::NotAuthenticated => {
                "Please log in again".to_string()
            }
            DashboardError::Network(_) | DashboardError::Status { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
