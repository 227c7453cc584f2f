//! Service table

use std::sync::Arc;

use crate::api::ServiceApiClient;
use crate::error::DashboardError;
use crate::events::DashboardEvent;
use crate::models::Service;

use super::ViewState;

#[derive(Debug)]
pub struct ServiceListView {
    api: Arc<ServiceApiClient>,
    state: ViewState<Vec<Service>>,
    fetch_count: usize,
}

impl ServiceListView {
    pub fn new(api: Arc<ServiceApiClient>) -> Self {
        Self {
            api,
            state: ViewState::Loading,
            fetch_count: 0,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Service>> {
        &self.state
    }

    /// Number of list requests issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// Fetch the services; the latest response replaces whatever was shown
    pub async fn load(&mut self) {
        self.fetch_count += 1;
        self.state = match self.api.list_services().await {
            Ok(services) if services.is_empty() => ViewState::Empty,
            Ok(services) => ViewState::Ready(services),
            Err(e) => {
                tracing::warn!("Failed to load services: {}", e);
                ViewState::Error(e.inline_message())
            }
        };
    }

    /// Delete a service and tell every list to refetch
    pub async fn delete(&mut self, id: &str) -> crate::Result<()> {
        self.api.delete_service(id).await?;
        self.api.events().publish(DashboardEvent::ServicesChanged);
        Ok(())
    }

    /// React to a bus event; returns whether a refetch happened
    pub async fn handle_event(&mut self, event: &DashboardEvent) -> bool {
        match event {
            DashboardEvent::ServicesChanged | DashboardEvent::NotificationsChanged { .. } => {
                self.load().await;
                true
            }
            DashboardEvent::SessionExpired => {
                self.state = ViewState::Error(DashboardError::AuthenticationExpired.inline_message());
                false
            }
        }
    }
}
