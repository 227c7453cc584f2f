//! Sign-in, sign-up and session management against the backend

use std::sync::Arc;

use serde::Deserialize;

use crate::error::DashboardError;
use crate::io::{HttpClient, HttpRequest};
use crate::models::{AuthToken, Credentials};
use crate::session::Session;

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) detail: Option<String>,
}

/// Authenticates the user and owns the token lifecycle
pub struct AuthClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    session: Session,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Created AuthClient for {}", base_url);
        Self {
            base_url,
            http,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a token and store it
    pub async fn login(&self, credentials: &Credentials) -> crate::Result<AuthToken> {
        let url = format!("{}/auth/sign-in", self.base_url);
        let request = HttpRequest::post(url).json(credentials)?;
        let response = self.http.send(request).await?;

        if !response.is_success() {
            tracing::debug!("Sign-in rejected with status {}", response.status);
            return Err(DashboardError::InvalidCredentials);
        }

        let token: AuthToken = response.json()?;
        self.session.set_token(&token)?;
        tracing::info!("Logged in as {}", credentials.username);
        Ok(token)
    }

    /// Create an account; the backend signs the new user in straight away
    pub async fn sign_up(&self, credentials: &Credentials) -> crate::Result<AuthToken> {
        let url = format!("{}/auth/sign-up", self.base_url);
        let request = HttpRequest::post(url).json(credentials)?;
        let response = self.http.send(request).await?;

        if !response.is_success() {
            let detail = serde_json::from_str::<ErrorDetail>(&response.body)
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| "Sign up failed".to_string());
            tracing::debug!(
                "Sign-up rejected with status {}: {}",
                response.status,
                detail
            );
            return Err(DashboardError::SignUpRejected(detail));
        }

        let token: AuthToken = response.json()?;
        self.session.set_token(&token)?;
        tracing::info!("Signed up as {}", credentials.username);
        Ok(token)
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.session.token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.session.authorization_header()
    }

    pub fn remove_token(&self) -> crate::Result<()> {
        self.session.remove_token()
    }

    pub fn logout(&self) -> crate::Result<()> {
        self.remove_token()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
