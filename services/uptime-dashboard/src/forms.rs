//! Client-side form validation
//!
//! Forms hold raw user input. `validate` either produces the typed request
//! body or the list of field errors to show inline; nothing invalid is ever
//! sent to the backend.

use serde::Serialize;

use crate::models::{
    AlertFrequency, Credentials, NewService, NotificationPreference, RefreshFrequency,
    ServiceType,
};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 8;

/// One failed check on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failed checks for a form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for `field`, as shown under the input
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Accepts absolute http(s) URLs with a host
pub fn is_valid_url(input: &str) -> bool {
    match reqwest::Url::parse(input.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn require(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
    }
}

/// Login form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "username", "Username", &self.username);
        require(&mut errors, "password", "Password", &self.password);
        errors.into_result(|| Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Sign-up form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "username", "Username", &self.username);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        errors.into_result(|| Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Add-service form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceForm {
    pub name: String,
    pub url: String,
    pub service_type: String,
    pub refresh_frequency: String,
    pub description: String,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            service_type: ServiceType::Api.to_string(),
            refresh_frequency: RefreshFrequency::OneMinute.to_string(),
            description: String::new(),
        }
    }
}

impl ServiceForm {
    pub fn validate(&self) -> Result<NewService, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        if !is_valid_url(&self.url) {
            errors.add("url", "Invalid URL");
        }
        let service_type = self.service_type.parse::<ServiceType>().ok();
        if service_type.is_none() {
            errors.add("service_type", "Service type must be API, Landing Page or Server");
        }
        let refresh_frequency = self.refresh_frequency.parse::<RefreshFrequency>().ok();
        if refresh_frequency.is_none() {
            errors.add(
                "refresh_frequency",
                "Check frequency must be 1 minute, 10 minutes or 1 hour",
            );
        }

        match (service_type, refresh_frequency) {
            (Some(service_type), Some(refresh_frequency)) if errors.is_empty() => {
                let description = self.description.trim();
                Ok(NewService {
                    name: self.name.trim().to_string(),
                    url: self.url.trim().to_string(),
                    service_type,
                    refresh_frequency,
                    description: (!description.is_empty()).then(|| description.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Notification settings form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationForm {
    pub webhook_url: String,
    pub alert_frequency: String,
}

impl Default for NotificationForm {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            alert_frequency: AlertFrequency::Always.to_string(),
        }
    }
}

impl From<&NotificationPreference> for NotificationForm {
    fn from(pref: &NotificationPreference) -> Self {
        Self {
            webhook_url: pref.webhook_url.clone(),
            alert_frequency: pref.alert_frequency.to_string(),
        }
    }
}

impl NotificationForm {
    pub fn validate(&self) -> Result<NotificationPreference, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_url(&self.webhook_url) {
            errors.add("webhook_url", "Invalid webhook URL");
        }
        let alert_frequency = self.alert_frequency.parse::<AlertFrequency>().ok();
        if alert_frequency.is_none() {
            errors.add("alert_frequency", "Alert frequency must be daily or always");
        }

        match alert_frequency {
            Some(alert_frequency) if errors.is_empty() => Ok(NotificationPreference {
                webhook_url: self.webhook_url.trim().to_string(),
                alert_frequency,
            }),
            _ => Err(errors),
        }
    }
}
