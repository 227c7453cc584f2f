//! Login and sign-up forms

use std::sync::Arc;

use crate::auth::AuthClient;
use crate::forms::{LoginForm, SignUpForm, ValidationErrors};

use super::Navigation;

/// Sign-in form state
#[derive(Debug)]
pub struct LoginView {
    auth: Arc<AuthClient>,
    pub form: LoginForm,
    pub field_errors: ValidationErrors,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginView {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self {
            auth,
            form: LoginForm::default(),
            field_errors: ValidationErrors::new(),
            error: None,
            submitting: false,
        }
    }

    /// Validate then sign in; `Some(Dashboard)` on success
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;
        let credentials = match self.form.validate() {
            Ok(credentials) => {
                self.field_errors = ValidationErrors::new();
                credentials
            }
            Err(errors) => {
                self.field_errors = errors;
                return None;
            }
        };

        self.submitting = true;
        let result = self.auth.login(&credentials).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.form = LoginForm::default();
                Some(Navigation::Dashboard)
            }
            Err(e) => {
                tracing::debug!("Login failed: {}", e);
                self.error = Some(e.inline_message());
                None
            }
        }
    }
}

/// Account creation form state
#[derive(Debug)]
pub struct SignUpView {
    auth: Arc<AuthClient>,
    pub form: SignUpForm,
    pub field_errors: ValidationErrors,
    pub error: Option<String>,
    pub submitting: bool,
}

impl SignUpView {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self {
            auth,
            form: SignUpForm::default(),
            field_errors: ValidationErrors::new(),
            error: None,
            submitting: false,
        }
    }

    /// Validate then register; on success the user is sent to the login view
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;
        let credentials = match self.form.validate() {
            Ok(credentials) => {
                self.field_errors = ValidationErrors::new();
                credentials
            }
            Err(errors) => {
                self.field_errors = errors;
                return None;
            }
        };

        self.submitting = true;
        let result = self.auth.sign_up(&credentials).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.form = SignUpForm::default();
                Some(Navigation::Login { registered: true })
            }
            Err(e) => {
                tracing::debug!("Sign-up failed: {}", e);
                self.error = Some(e.inline_message());
                None
            }
        }
    }
}
