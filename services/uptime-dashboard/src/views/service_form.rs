//! Add-service form

use std::sync::Arc;

use crate::api::ServiceApiClient;
use crate::events::DashboardEvent;
use crate::forms::{ServiceForm, ValidationErrors};
use crate::models::Service;

#[derive(Debug)]
pub struct AddServiceView {
    api: Arc<ServiceApiClient>,
    pub form: ServiceForm,
    pub field_errors: ValidationErrors,
    pub error: Option<String>,
    pub submitting: bool,
}

impl AddServiceView {
    pub fn new(api: Arc<ServiceApiClient>) -> Self {
        Self {
            api,
            form: ServiceForm::default(),
            field_errors: ValidationErrors::new(),
            error: None,
            submitting: false,
        }
    }

    /// Validate, create, reset the form and announce `ServicesChanged`
    pub async fn submit(&mut self) -> Option<Service> {
        self.error = None;
        let new_service = match self.form.validate() {
            Ok(new_service) => {
                self.field_errors = ValidationErrors::new();
                new_service
            }
            Err(errors) => {
                self.field_errors = errors;
                return None;
            }
        };

        self.submitting = true;
        let result = self.api.create_service(&new_service).await;
        self.submitting = false;

        match result {
            Ok(service) => {
                self.form = ServiceForm::default();
                self.api.events().publish(DashboardEvent::ServicesChanged);
                Some(service)
            }
            Err(e) => {
                tracing::debug!("Creating service failed: {}", e);
                self.error = Some(e.inline_message());
                None
            }
        }
    }
}
