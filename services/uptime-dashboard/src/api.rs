//! Authenticated access to services, statistics and notification settings

use std::sync::Arc;

use crate::auth::ErrorDetail;
use crate::error::DashboardError;
use crate::events::{DashboardEvent, EventBus};
use crate::io::{HttpClient, HttpRequest, HttpResponse};
use crate::models::{NewService, NotificationPreference, Service, ServiceStats, UserProfile};
use crate::session::Session;

/// 404 detail meaning the service exists but has no preference yet
const NO_PREFERENCES_DETAIL: &str = "No notification preferences found";

/// Client for the service endpoints; every call carries the session token
pub struct ServiceApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    session: Session,
    events: EventBus,
}

impl std::fmt::Debug for ServiceApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ServiceApiClient {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        session: Session,
        events: EventBus,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Created ServiceApiClient for {}", base_url);
        Self {
            base_url,
            http,
            session,
            events,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request` with the Authorization header attached
    ///
    /// A 401 clears the session, publishes [`DashboardEvent::SessionExpired`]
    /// and fails with [`DashboardError::AuthenticationExpired`]. Any other
    /// status is handed back untouched.
    pub async fn fetch_with_auth(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        let header = self
            .session
            .authorization_header()
            .ok_or(DashboardError::NotAuthenticated)?;

        let response = self
            .http
            .send(request.header("Authorization", header))
            .await?;

        if response.status == 401 {
            tracing::warn!("Session expired, clearing stored token");
            if let Err(e) = self.session.remove_token() {
                tracing::warn!("Failed to clear expired token: {}", e);
            }
            self.events.publish(DashboardEvent::SessionExpired);
            return Err(DashboardError::AuthenticationExpired);
        }

        Ok(response)
    }

    pub async fn list_services(&self) -> crate::Result<Vec<Service>> {
        let response = self
            .fetch_with_auth(HttpRequest::get(self.url("/services/")))
            .await?;
        response.error_for_status()?.json()
    }

    pub async fn create_service(&self, service: &NewService) -> crate::Result<Service> {
        let request = HttpRequest::post(self.url("/services/")).json(service)?;
        let response = self.fetch_with_auth(request).await?;
        let created: Service = response.error_for_status()?.json()?;
        tracing::debug!("Created service '{}' ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn delete_service(&self, id: &str) -> crate::Result<()> {
        let request = HttpRequest::delete(self.url(&format!("/services/{}", id)));
        self.fetch_with_auth(request).await?.error_for_status()?;
        tracing::debug!("Deleted service {}", id);
        Ok(())
    }

    pub async fn service_stats(&self, id: &str) -> crate::Result<ServiceStats> {
        let request = HttpRequest::get(self.url(&format!("/services/{}/stats/aggregated", id)));
        let response = self.fetch_with_auth(request).await?;
        response.error_for_status()?.json()
    }

    /// The service's notification preference; `None` when none is configured
    ///
    /// Any other 404, such as an unknown service, is an error.
    pub async fn notification(&self, id: &str) -> crate::Result<Option<NotificationPreference>> {
        let request = HttpRequest::get(self.notifications_url(id));
        let response = self.fetch_with_auth(request).await?;
        if response.status == 404 {
            let detail = serde_json::from_str::<ErrorDetail>(&response.body)
                .ok()
                .and_then(|e| e.detail);
            if detail.as_deref() == Some(NO_PREFERENCES_DETAIL) {
                return Ok(None);
            }
            tracing::warn!("Notification lookup for {} failed: {:?}", id, detail);
        }
        response.error_for_status()?.json().map(Some)
    }

    pub async fn create_notification(
        &self,
        id: &str,
        preference: &NotificationPreference,
    ) -> crate::Result<NotificationPreference> {
        let request = HttpRequest::post(self.notifications_url(id)).json(&notification_body(
            id, preference,
        ))?;
        let response = self.fetch_with_auth(request).await?;
        response.error_for_status()?.json()
    }

    pub async fn update_notification(
        &self,
        id: &str,
        preference: &NotificationPreference,
    ) -> crate::Result<NotificationPreference> {
        let request = HttpRequest::put(self.notifications_url(id)).json(&notification_body(
            id, preference,
        ))?;
        let response = self.fetch_with_auth(request).await?;
        response.error_for_status()?.json()
    }

    pub async fn delete_notification(&self, id: &str) -> crate::Result<()> {
        let request = HttpRequest::delete(self.notifications_url(id));
        self.fetch_with_auth(request).await?.error_for_status()?;
        Ok(())
    }

    pub async fn current_user(&self) -> crate::Result<UserProfile> {
        let response = self
            .fetch_with_auth(HttpRequest::get(self.url("/auth/me")))
            .await?;
        response.error_for_status()?.json()
    }

    /// Unauthenticated liveness check of the backend
    pub async fn health(&self) -> crate::Result<bool> {
        let response = self.http.send(HttpRequest::get(self.url("/health"))).await?;
        Ok(response.is_success())
    }

    fn notifications_url(&self, id: &str) -> String {
        self.url(&format!("/services/{}/notifications", id))
    }
}

/// The backend expects the service id and delivery method alongside the preference
fn notification_body(id: &str, preference: &NotificationPreference) -> serde_json::Value {
    serde_json::json!({
        "service_id": id,
        "notification_method": "slack",
        "webhook_url": preference.webhook_url,
        "alert_frequency": preference.alert_frequency,
    })
}
