//! Per-service webhook notification settings (modal)

use std::sync::Arc;

use crate::api::ServiceApiClient;
use crate::events::DashboardEvent;
use crate::forms::{NotificationForm, ValidationErrors};
use crate::models::NotificationPreference;

#[derive(Debug)]
pub struct NotificationView {
    api: Arc<ServiceApiClient>,
    service_id: String,
    existing: Option<NotificationPreference>,
    pub form: NotificationForm,
    pub field_errors: ValidationErrors,
    pub error: Option<String>,
    pub open: bool,
}

impl NotificationView {
    pub fn new(api: Arc<ServiceApiClient>, service_id: impl Into<String>) -> Self {
        Self {
            api,
            service_id: service_id.into(),
            existing: None,
            form: NotificationForm::default(),
            field_errors: ValidationErrors::new(),
            error: None,
            open: false,
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn existing(&self) -> Option<&NotificationPreference> {
        self.existing.as_ref()
    }

    /// Open the modal, prefilled with the stored preference when there is one
    pub async fn open(&mut self) -> crate::Result<()> {
        self.error = None;
        self.field_errors = ValidationErrors::new();
        self.existing = self.api.notification(&self.service_id).await?;
        self.form = self
            .existing
            .as_ref()
            .map(NotificationForm::from)
            .unwrap_or_default();
        self.open = true;
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Create or update, then close; `false` leaves the modal open with errors
    pub async fn save(&mut self) -> bool {
        self.error = None;
        let preference = match self.form.validate() {
            Ok(preference) => {
                self.field_errors = ValidationErrors::new();
                preference
            }
            Err(errors) => {
                self.field_errors = errors;
                return false;
            }
        };

        let result = if self.existing.is_some() {
            self.api
                .update_notification(&self.service_id, &preference)
                .await
        } else {
            self.api
                .create_notification(&self.service_id, &preference)
                .await
        };

        match result {
            Ok(saved) => {
                self.existing = Some(saved);
                self.announce();
                self.close();
                true
            }
            Err(e) => {
                tracing::debug!("Saving notification for {} failed: {}", self.service_id, e);
                self.error = Some(e.inline_message());
                false
            }
        }
    }

    /// Delete the preference, then close
    pub async fn remove(&mut self) -> bool {
        self.error = None;
        match self.api.delete_notification(&self.service_id).await {
            Ok(()) => {
                self.existing = None;
                self.form = NotificationForm::default();
                self.announce();
                self.close();
                true
            }
            Err(e) => {
                tracing::debug!("Removing notification for {} failed: {}", self.service_id, e);
                self.error = Some(e.inline_message());
                false
            }
        }
    }

    fn announce(&self) {
        self.api.events().publish(DashboardEvent::NotificationsChanged {
            service_id: self.service_id.clone(),
        });
    }
}
